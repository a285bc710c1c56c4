use std::collections::HashMap;
use std::sync::Arc;

use podwire_xml::XmlNode;

use crate::entity::{Entity, PropertyMap, Value};
use crate::error::{EntityError, EntityResult};
use crate::schema::{EntitySchema, PropertyDef, PropertyDefault, PropertyKind, SchemaBuilder};

/// Explicit registry of entity schemas.
///
/// The registry is populated once at startup and then only read; it is the
/// single source of truth for type resolution in both directions (type
/// name → schema for construction, wire tag → schema for deserialization).
/// It is a plain value: share it behind an `Arc` when several parsers run
/// concurrently.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    by_type: HashMap<String, Arc<EntitySchema>>,
    by_wire_name: HashMap<String, Arc<EntitySchema>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers a schema.
    ///
    /// Property names must be plain identifiers and unique within the
    /// schema; nested properties must reference an already-registered
    /// type; the type name and its derived wire name must not collide
    /// with a previous registration.
    pub fn define(&mut self, builder: SchemaBuilder) -> EntityResult<()> {
        let (entity_type, properties) = builder.into_parts();

        if entity_type.is_empty() {
            return Err(invalid(&entity_type, "empty type name"));
        }
        if self.by_type.contains_key(&entity_type) {
            return Err(invalid(&entity_type, "type already registered"));
        }

        let mut seen = Vec::with_capacity(properties.len());
        for def in &properties {
            if !identifier_valid(&def.name) {
                return Err(invalid(
                    &entity_type,
                    &format!("property name `{}` is not a plain identifier", def.name),
                ));
            }
            if seen.contains(&def.name.as_str()) {
                return Err(invalid(
                    &entity_type,
                    &format!("duplicate property `{}`", def.name),
                ));
            }
            seen.push(def.name.as_str());

            if let PropertyKind::Child { entity_type: nested }
            | PropertyKind::ChildList { entity_type: nested } = &def.kind
            {
                if !self.by_type.contains_key(nested) {
                    return Err(invalid(
                        &entity_type,
                        &format!("property `{}` references unknown type `{nested}`", def.name),
                    ));
                }
            }
        }

        let schema = Arc::new(EntitySchema::new(entity_type, properties));
        if self.by_wire_name.contains_key(schema.wire_name()) {
            return Err(invalid(
                schema.entity_type(),
                &format!("wire name `{}` already taken", schema.wire_name()),
            ));
        }

        self.by_type
            .insert(schema.entity_type().to_string(), Arc::clone(&schema));
        self.by_wire_name
            .insert(schema.wire_name().to_string(), schema);
        Ok(())
    }

    /// Looks up a schema by type name.
    pub fn schema(&self, entity_type: &str) -> EntityResult<&Arc<EntitySchema>> {
        self.by_type
            .get(entity_type)
            .ok_or_else(|| EntityError::UnknownEntityType(entity_type.to_string()))
    }

    /// Resolves a bare wire tag back to its schema.
    pub fn resolve_wire_name(&self, tag: &str) -> EntityResult<&Arc<EntitySchema>> {
        self.by_wire_name
            .get(tag)
            .ok_or_else(|| EntityError::UnknownEntityType(tag.to_string()))
    }

    /// Constructs a validated, immutable entity from an attribute map.
    ///
    /// Attributes for undeclared properties are silently discarded —
    /// intentional forward compatibility with fields this pod does not
    /// know yet. An explicit [`Value::Nil`] counts as absent. Absent
    /// optional properties resolve their default; absent required ones
    /// fail together, named in declaration order.
    pub fn construct(
        &self,
        entity_type: &str,
        attributes: impl IntoIterator<Item = (String, Value)>,
    ) -> EntityResult<Entity> {
        let schema = Arc::clone(self.schema(entity_type)?);
        let mut supplied: PropertyMap = attributes
            .into_iter()
            .filter(|(_, value)| !value.is_nil())
            .collect();

        let mut properties = PropertyMap::new();
        let mut missing = Vec::new();
        for def in schema.properties() {
            match supplied.remove(&def.name) {
                Some(value) => {
                    let value = check_value(&schema, def, value)?;
                    properties.insert(def.name.clone(), value);
                }
                None => match &def.default {
                    PropertyDefault::Required => missing.push(def.name.clone()),
                    PropertyDefault::Nil => {
                        properties.insert(def.name.clone(), nil_value(&def.kind));
                    }
                    PropertyDefault::Fixed(value) => {
                        properties.insert(def.name.clone(), Value::Text((*value).to_string()));
                    }
                    PropertyDefault::Provider(provider) => {
                        properties.insert(def.name.clone(), Value::Text(provider()));
                    }
                },
            }
        }

        if !missing.is_empty() {
            return Err(EntityError::MissingRequiredProperties {
                entity_type: schema.entity_type().to_string(),
                names: missing,
            });
        }
        Ok(Entity::new(schema, properties))
    }

    /// Rebuilds an entity of the given type from its serialized tree.
    ///
    /// Scalars are matched by property name, nested entities by the nested
    /// type's wire name. Unknown child elements are ignored; absent
    /// required properties surface as
    /// [`EntityError::MissingRequiredProperties`] from construction.
    pub fn entity_from_xml(&self, entity_type: &str, node: &XmlNode) -> EntityResult<Entity> {
        let schema = Arc::clone(self.schema(entity_type)?);
        let mut attributes: Vec<(String, Value)> = Vec::new();

        for def in schema.properties() {
            match &def.kind {
                PropertyKind::Scalar => {
                    if let Some(child) = node.child(&def.name) {
                        let text = child.text().unwrap_or("").to_string();
                        attributes.push((def.name.clone(), Value::Text(text)));
                    }
                }
                PropertyKind::Child { entity_type: nested } => {
                    let wire_name = self.schema(nested)?.wire_name().to_string();
                    if let Some(child) = node.child(&wire_name) {
                        let entity = self.entity_from_xml(nested, child)?;
                        attributes.push((def.name.clone(), Value::Entity(entity)));
                    }
                }
                PropertyKind::ChildList { entity_type: nested } => {
                    let wire_name = self.schema(nested)?.wire_name().to_string();
                    let items = node
                        .children_named(&wire_name)
                        .map(|child| self.entity_from_xml(nested, child))
                        .collect::<EntityResult<Vec<Entity>>>()?;
                    if !items.is_empty() {
                        attributes.push((def.name.clone(), Value::EntityList(items)));
                    }
                }
            }
        }

        self.construct(entity_type, attributes)
    }
}

/// The resolved value of an absent optional property.
fn nil_value(kind: &PropertyKind) -> Value {
    match kind {
        PropertyKind::ChildList { .. } => Value::EntityList(Vec::new()),
        _ => Value::Nil,
    }
}

fn check_value(schema: &EntitySchema, def: &PropertyDef, value: Value) -> EntityResult<Value> {
    let mismatch = |expected: &'static str| EntityError::UnexpectedValueType {
        entity_type: schema.entity_type().to_string(),
        property: def.name.clone(),
        expected,
    };

    match &def.kind {
        PropertyKind::Scalar => match value {
            Value::Text(_) => Ok(value),
            _ => Err(mismatch("a scalar value")),
        },
        PropertyKind::Child { entity_type } => match value {
            Value::Entity(ref entity) if entity.entity_type() == entity_type.as_str() => Ok(value),
            _ => Err(mismatch("a nested entity of the declared type")),
        },
        PropertyKind::ChildList { entity_type } => match value {
            Value::EntityList(ref list)
                if list.iter().all(|e| e.entity_type() == entity_type.as_str()) =>
            {
                Ok(value)
            }
            _ => Err(mismatch("a list of nested entities of the declared type")),
        },
    }
}

fn identifier_valid(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn invalid(entity_type: &str, reason: &str) -> EntityError {
    EntityError::InvalidSchema {
        entity_type: entity_type.to_string(),
        reason: reason.to_string(),
    }
}
