use podwire_xml::XmlNode;

use crate::entity::Entity;
use crate::error::{EntityError, EntityResult};
use crate::registry::EntityRegistry;

/// Outer tag of the legacy payload wrapper.
pub const WRAPPER_OUTER_TAG: &str = "XML";

/// Inner tag of the legacy payload wrapper. Every payload travels inside
/// a `post` element, whatever its actual entity type.
pub const WRAPPER_INNER_TAG: &str = "post";

/// Wraps one serialized entity in the fixed legacy envelope shape:
///
/// ```xml
/// <XML>
///   <post>
///     {entity}
///   </post>
/// </XML>
/// ```
///
/// The exact two-level nesting is a wire-compatibility requirement; peers
/// reject anything else.
pub struct XmlPayload;

impl XmlPayload {
    /// Encapsulates an entity inside the wrapper structure.
    pub fn pack(entity: &Entity) -> XmlNode {
        let mut inner = XmlNode::new(WRAPPER_INNER_TAG);
        inner.append(entity.to_xml());
        let mut outer = XmlNode::new(WRAPPER_OUTER_TAG);
        outer.append(inner);
        outer
    }

    /// Validates the wrapper structure, resolves the inner element's tag
    /// against the registry and reconstructs the entity.
    pub fn unpack(node: &XmlNode, registry: &EntityRegistry) -> EntityResult<Entity> {
        if node.name() != WRAPPER_OUTER_TAG || node.children().len() != 1 {
            return Err(EntityError::InvalidStructure);
        }
        let inner = &node.children()[0];
        if inner.name() != WRAPPER_INNER_TAG || inner.children().len() != 1 {
            return Err(EntityError::InvalidStructure);
        }

        let data = &inner.children()[0];
        let schema = registry.resolve_wire_name(data.name())?;
        let entity_type = schema.entity_type().to_string();
        registry.entity_from_xml(&entity_type, data)
    }
}
