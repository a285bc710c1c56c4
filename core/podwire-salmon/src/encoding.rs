//! The opaque encoding used for every binary wire field.
//!
//! URL-safe base64 with padding, applied uniformly to envelope data and
//! signatures, AES keys/ivs/ciphertexts and the RSA-wrapped header blob.
//! Signer and verifier must agree on this transform byte for byte.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;

/// Encodes bytes into the wire's opaque text form.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE.encode(bytes)
}

/// Decodes the wire's opaque text form back into bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE.decode(text)
}
