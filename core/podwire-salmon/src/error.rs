//! Error types for the envelope and slap layer.

use podwire_entity::EntityError;
use podwire_xml::XmlError;
use thiserror::Error;

/// Result type for salmon operations.
pub type SalmonResult<T> = Result<T, SalmonError>;

/// Errors that can occur while generating or consuming envelopes and
/// slap documents.
///
/// Everything here is a non-retriable data or protocol error.
/// [`SalmonError::MissingVerificationKey`] is the one exception: it marks
/// caller misuse, not a malformed message.
#[derive(Debug, Error)]
pub enum SalmonError {
    /// The envelope node does not have the expected four children.
    #[error("invalid magic envelope structure")]
    InvalidEnvelope,

    /// The envelope signature does not verify against the signing subject.
    #[error("envelope signature verification failed")]
    InvalidSignature,

    /// The envelope declares a payload encoding this protocol never uses.
    #[error("unsupported payload encoding: {0}")]
    InvalidEncoding(String),

    /// The envelope declares a signature algorithm this protocol never uses.
    #[error("unsupported signature algorithm: {0}")]
    InvalidAlgorithm(String),

    /// The slap document has no `header/author_id` element.
    #[error("slap document has no author_id header")]
    MissingAuthor,

    /// The slap document has no magic envelope element.
    #[error("slap document has no magic envelope")]
    MissingMagicEnvelope,

    /// The encrypted slap document has no `encrypted_header` element.
    #[error("slap document has no encrypted header")]
    MissingHeader,

    /// The decrypted header is not the expected `decrypted_header` tree.
    #[error("decrypted header is malformed")]
    InvalidHeader,

    /// The first entity extraction was attempted without a verification
    /// key. Caller misuse, not a malformed message.
    #[error("a verification key is required for the first entity extraction")]
    MissingVerificationKey,

    /// Symmetric or RSA decryption failed (malformed ciphertext, key or
    /// iv, or a wrong key). Distinct from a signature failure.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// RSA encryption failed (e.g. payload too large for the key).
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// A key could not be generated or parsed.
    #[error("invalid rsa key: {0}")]
    InvalidKey(String),

    /// Producing a signature failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// A wire field was not valid opaque encoding.
    #[error("invalid opaque encoding: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// One of the JSON header blobs was malformed.
    #[error("malformed json header: {0}")]
    Json(#[from] serde_json::Error),

    /// Entity reconstruction failed after unwrapping.
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// A document or payload was not parseable XML.
    #[error(transparent)]
    Xml(#[from] XmlError),
}
