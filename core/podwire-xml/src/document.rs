//! Parsing of wire documents into [`XmlNode`] trees.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{XmlError, XmlResult};
use crate::node::XmlNode;

/// The declaration every generated wire document starts with.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Prepends the default XML declaration when the caller-supplied document
/// lacks one.
pub fn ensure_declaration(document: &str) -> Cow<'_, str> {
    if document.contains("<?xml") {
        Cow::Borrowed(document)
    } else {
        Cow::Owned(format!("{XML_DECLARATION}\n{document}"))
    }
}

/// Parses a document string into its root element.
///
/// Insignificant whitespace between elements is dropped, so structurally
/// equal documents parse to equal trees regardless of formatting. The
/// declaration, comments and processing instructions are skipped.
pub fn parse_document(document: &str) -> XmlResult<XmlNode> {
    let mut reader = Reader::from_str(document);
    let config = reader.config_mut();
    config.trim_text_start = true;
    config.trim_text_end = true;

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(start) => {
                stack.push(element_from(&start)?);
            }
            Event::Empty(start) => {
                let node = element_from(&start)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                // quick-xml rejects mismatched end tags before we get here
                let node = stack.pop().ok_or(XmlError::EmptyDocument)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    let content = text.unescape().map_err(malformed)?;
                    if !content.is_empty() {
                        let mut combined = parent.text().unwrap_or("").to_string();
                        combined.push_str(&content);
                        parent.set_text(combined);
                    }
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let content = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    let mut combined = parent.text().unwrap_or("").to_string();
                    combined.push_str(&content);
                    parent.set_text(combined);
                }
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if !stack.is_empty() {
        return Err(XmlError::Malformed("unclosed element".into()));
    }
    root.ok_or(XmlError::EmptyDocument)
}

fn element_from(start: &BytesStart<'_>) -> XmlResult<XmlNode> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut node = XmlNode::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(malformed)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(malformed)?.into_owned();
        node.set_attribute(key, value);
    }
    Ok(node)
}

fn attach(stack: &mut Vec<XmlNode>, root: &mut Option<XmlNode>, node: XmlNode) -> XmlResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.append(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(XmlError::Malformed("multiple root elements".into())),
    }
    Ok(())
}

fn malformed(error: impl std::fmt::Display) -> XmlError {
    XmlError::Malformed(error.to_string())
}
