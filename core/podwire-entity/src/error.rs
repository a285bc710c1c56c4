//! Error types for schema handling and entity construction.

use podwire_xml::XmlError;
use thiserror::Error;

/// Result type for entity operations.
pub type EntityResult<T> = Result<T, EntityError>;

/// Errors that can occur while defining schemas or building entities.
#[derive(Debug, Error)]
pub enum EntityError {
    /// A schema definition was rejected at registration time.
    #[error("invalid schema for {entity_type}: {reason}")]
    InvalidSchema { entity_type: String, reason: String },

    /// Required properties were absent at construction.
    #[error("missing required properties for {entity_type}: {}", names.join(", "))]
    MissingRequiredProperties {
        entity_type: String,
        names: Vec<String>,
    },

    /// A wire tag that no registered schema maps to.
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),

    /// A payload wrapper that deviates from the fixed legacy shape.
    #[error("invalid payload structure")]
    InvalidStructure,

    /// The caller supplied a value of the wrong shape for a property.
    /// This marks caller misuse, not a malformed message.
    #[error("unexpected value for {entity_type}.{property}: expected {expected}")]
    UnexpectedValueType {
        entity_type: String,
        property: String,
        expected: &'static str,
    },

    /// Underlying tree error.
    #[error(transparent)]
    Xml(#[from] XmlError),
}
