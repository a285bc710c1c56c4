use quick_xml::escape::escape;

use crate::document::XML_DECLARATION;

/// A single element in a wire document tree.
///
/// Attribute and child order are preserved; both matter for byte-exact
/// output. Text content and child elements are modeled separately — the
/// wire format never mixes text and elements inside one parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
    text: Option<String>,
}

impl XmlNode {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Creates an element with text content.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut node = Self::new(name);
        node.text = Some(text.into());
        node
    }

    /// Returns the element name, including any namespace prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the text content, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Sets the text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Sets an attribute, replacing an existing one with the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    /// Returns an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns all attributes in declaration order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Appends a child element.
    pub fn append(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    /// Returns all child elements in document order.
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Returns the first child with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns all children with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Walks a `/`-separated path of element names, following the first
    /// match at each step.
    pub fn locate(&self, path: &str) -> Option<&XmlNode> {
        let mut current = self;
        for segment in path.split('/') {
            current = current.child(segment)?;
        }
        Some(current)
    }

    /// Serializes the tree compactly, without an XML declaration.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    /// Serializes the tree as a full wire document with the standard
    /// XML declaration.
    pub fn to_document_string(&self) -> String {
        let mut out = String::with_capacity(XML_DECLARATION.len() + 1);
        out.push_str(XML_DECLARATION);
        out.push('\n');
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }

        let text = self.text.as_deref().unwrap_or("");
        if self.children.is_empty() && text.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        out.push_str(&escape(text));
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}
