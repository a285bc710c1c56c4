//! Error types for XML handling.

use thiserror::Error;

/// Result type for XML operations.
pub type XmlResult<T> = Result<T, XmlError>;

/// Errors that can occur while parsing or building wire documents.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The input could not be parsed as XML.
    #[error("malformed xml: {0}")]
    Malformed(String),

    /// The document contained no root element.
    #[error("document has no root element")]
    EmptyDocument,
}
