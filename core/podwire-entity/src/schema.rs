//! Declarative property schemas for entity types.
//!
//! A schema is an ordered table of property definitions bound to a type
//! name. Declaration order is the wire serialization order. Schemas are
//! built with [`SchemaBuilder`], validated and frozen when registered with
//! an [`crate::EntityRegistry`], and never change afterwards.

/// What shape of value a property holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    /// A text value, serialized as a child element named after the property.
    Scalar,
    /// A single nested entity of the named type.
    Child { entity_type: String },
    /// Zero or more nested entities of the named type.
    ChildList { entity_type: String },
}

/// How a property behaves when it is absent at construction time.
#[derive(Debug, Clone)]
pub enum PropertyDefault {
    /// Absence is an error.
    Required,
    /// Absence resolves to nil (empty element / skipped child / empty list).
    Nil,
    /// Absence resolves to a fixed text value.
    Fixed(&'static str),
    /// Absence resolves to the provider's result, evaluated per construction.
    Provider(fn() -> String),
}

/// One property of an entity type.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
    pub default: PropertyDefault,
}

/// The frozen, ordered property table of one entity type.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    entity_type: String,
    wire_name: String,
    properties: Vec<PropertyDef>,
}

impl EntitySchema {
    pub(crate) fn new(entity_type: String, properties: Vec<PropertyDef>) -> Self {
        let wire_name = wire_name(&entity_type);
        Self {
            entity_type,
            wire_name,
            properties,
        }
    }

    /// The CamelCase type name, e.g. `StatusMessage`.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// The canonical wire tag, e.g. `status_message`.
    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    /// All properties in declaration (= serialization) order.
    pub fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }

    /// Looks up a property definition by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Declares the property table of an entity type, in wire order.
///
/// Validation (identifier names, known nested types, collision-free wire
/// names) happens when the result is handed to
/// [`crate::EntityRegistry::define`], which has the full picture.
#[derive(Debug)]
pub struct SchemaBuilder {
    entity_type: String,
    properties: Vec<PropertyDef>,
}

impl SchemaBuilder {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            properties: Vec::new(),
        }
    }

    fn push(mut self, name: &str, kind: PropertyKind, default: PropertyDefault) -> Self {
        self.properties.push(PropertyDef {
            name: name.into(),
            kind,
            default,
        });
        self
    }

    /// A required scalar property.
    pub fn property(self, name: &str) -> Self {
        self.push(name, PropertyKind::Scalar, PropertyDefault::Required)
    }

    /// An optional scalar property defaulting to nil.
    pub fn optional(self, name: &str) -> Self {
        self.push(name, PropertyKind::Scalar, PropertyDefault::Nil)
    }

    /// An optional scalar property with a fixed default value.
    pub fn defaulted(self, name: &str, value: &'static str) -> Self {
        self.push(name, PropertyKind::Scalar, PropertyDefault::Fixed(value))
    }

    /// An optional scalar property whose default is computed at
    /// construction time.
    pub fn generated(self, name: &str, provider: fn() -> String) -> Self {
        self.push(name, PropertyKind::Scalar, PropertyDefault::Provider(provider))
    }

    /// A required nested entity of the given type.
    pub fn child(self, name: &str, entity_type: &str) -> Self {
        self.push(
            name,
            PropertyKind::Child {
                entity_type: entity_type.into(),
            },
            PropertyDefault::Required,
        )
    }

    /// An optional nested entity, skipped on the wire when absent.
    pub fn optional_child(self, name: &str, entity_type: &str) -> Self {
        self.push(
            name,
            PropertyKind::Child {
                entity_type: entity_type.into(),
            },
            PropertyDefault::Nil,
        )
    }

    /// A list of nested entities of the given type, defaulting to empty.
    pub fn child_list(self, name: &str, entity_type: &str) -> Self {
        self.push(
            name,
            PropertyKind::ChildList {
                entity_type: entity_type.into(),
            },
            PropertyDefault::Nil,
        )
    }

    pub(crate) fn into_parts(self) -> (String, Vec<PropertyDef>) {
        (self.entity_type, self.properties)
    }
}

/// Derives the canonical wire tag from a type name.
///
/// Any module qualifier is stripped, an underscore is inserted between an
/// acronym or digit run and a following capitalized word and between a
/// lowercase/digit character and a capital, hyphens become underscores,
/// and the result is lowercased. The mapping must stay collision-free
/// across all registered types; the registry enforces that.
pub fn wire_name(type_name: &str) -> String {
    let base = type_name.rsplit("::").next().unwrap_or(type_name);
    let chars: Vec<char> = base.chars().collect();
    let mut out = String::with_capacity(base.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' {
            out.push('_');
            continue;
        }
        if c.is_ascii_uppercase() {
            let prev = if i > 0 { Some(chars[i - 1]) } else { None };
            let next = chars.get(i + 1);
            let after_lower = prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
            let acronym_end = prev.is_some_and(|p| p.is_ascii_uppercase())
                && next.is_some_and(|n| n.is_ascii_lowercase());
            if after_lower || acronym_end {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
