use std::collections::BTreeMap;
use std::sync::Arc;

use podwire_xml::XmlNode;

use crate::schema::{EntitySchema, PropertyKind};

/// A property value carried by an [`Entity`].
///
/// Scalars are text on the wire, so every primitive input is normalized to
/// its wire text at construction; `Nil` is the absent optional value. An
/// absent optional and an empty string are the same wire state (both
/// serialize to an empty element), so they compare equal.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Text(String),
    Entity(Entity),
    EntityList(Vec<Entity>),
}

impl Value {
    /// Returns the text content for scalar values, `""` for nil.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Nil => Some(""),
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the nested entity, if this is one.
    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Value::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    /// Returns the nested entity list, if this is one.
    pub fn as_entity_list(&self) -> Option<&[Entity]> {
        match self {
            Value::EntityList(list) => Some(list),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Nil, Value::Text(t)) | (Value::Text(t), Value::Nil) => t.is_empty(),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Entity(a), Value::Entity(b)) => a == b,
            (Value::EntityList(a), Value::EntityList(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Text(if value { "true" } else { "false" }.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Entity> for Value {
    fn from(value: Entity) -> Self {
        Value::Entity(value)
    }
}

impl From<Vec<Entity>> for Value {
    fn from(value: Vec<Entity>) -> Self {
        Value::EntityList(value)
    }
}

/// Deterministic name → value association for an entity's properties.
pub type PropertyMap = BTreeMap<String, Value>;

/// An immutable, schema-validated protocol message value.
///
/// Constructed only through [`crate::EntityRegistry::construct`], which
/// checks required properties, resolves defaults and verifies nested
/// types. There is no mutation API; the complete property map is fixed at
/// construction.
#[derive(Debug, Clone)]
pub struct Entity {
    schema: Arc<EntitySchema>,
    properties: PropertyMap,
}

impl Entity {
    pub(crate) fn new(schema: Arc<EntitySchema>, properties: PropertyMap) -> Self {
        Self { schema, properties }
    }

    /// The entity's type name, e.g. `StatusMessage`.
    pub fn entity_type(&self) -> &str {
        self.schema.entity_type()
    }

    /// The entity's canonical wire tag, e.g. `status_message`.
    pub fn wire_name(&self) -> &str {
        self.schema.wire_name()
    }

    /// The schema this entity was validated against.
    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    /// Returns a property value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Returns a scalar property's text, `""` when the property is nil.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    /// The full name → value map, including resolved defaults.
    ///
    /// Reconstructing through the registry from this map yields an entity
    /// equal to this one, field by field.
    pub fn to_map(&self) -> PropertyMap {
        self.properties.clone()
    }

    /// Serializes this entity and everything nested in it to a tree.
    ///
    /// The root tag is the canonical wire name; properties appear as
    /// children in declaration order. Scalars keep their (possibly empty)
    /// element, nil nested entities are skipped, lists emit one child per
    /// element.
    pub fn to_xml(&self) -> XmlNode {
        let mut root = XmlNode::new(self.schema.wire_name());
        for def in self.schema.properties() {
            let value = self.properties.get(&def.name);
            match &def.kind {
                PropertyKind::Scalar => {
                    let mut node = XmlNode::new(def.name.as_str());
                    if let Some(Value::Text(text)) = value {
                        if !text.is_empty() {
                            node.set_text(text.as_str());
                        }
                    }
                    root.append(node);
                }
                PropertyKind::Child { .. } => {
                    if let Some(Value::Entity(entity)) = value {
                        root.append(entity.to_xml());
                    }
                }
                PropertyKind::ChildList { .. } => {
                    if let Some(Value::EntityList(list)) = value {
                        for entity in list {
                            root.append(entity.to_xml());
                        }
                    }
                }
            }
        }
        root
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.schema.entity_type() == other.schema.entity_type()
            && self.properties == other.properties
    }
}
