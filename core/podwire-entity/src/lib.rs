//! Schema-validated federation entities.
//!
//! Protocol messages ("entities") are declared as ordered property tables
//! rather than per-type structs, and one generic serializer walks those
//! tables in both directions:
//! - [`SchemaBuilder`] declares an entity type's properties in wire order,
//! - [`EntityRegistry`] validates and stores the schemas, constructs
//!   immutable [`Entity`] values, and resolves wire tags back to types,
//! - [`XmlPayload`] wraps a serialized entity in the fixed legacy envelope
//!   shape all federation payloads travel in,
//! - [`catalog`] registers the built-in entity types of the protocol.
//!
//! Entities are constructed once, validated completely at that point, and
//! never mutated. Unknown attributes are dropped on construction so newer
//! pods can add fields without breaking older ones.

pub mod catalog;
mod entity;
mod error;
mod payload;
mod registry;
mod schema;

pub use entity::{Entity, PropertyMap, Value};
pub use error::{EntityError, EntityResult};
pub use payload::{WRAPPER_INNER_TAG, WRAPPER_OUTER_TAG, XmlPayload};
pub use registry::EntityRegistry;
pub use schema::{EntitySchema, PropertyDef, PropertyDefault, PropertyKind, SchemaBuilder, wire_name};
