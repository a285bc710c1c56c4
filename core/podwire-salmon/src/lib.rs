//! Salmon-derived cryptographic envelope for federation messages.
//!
//! A serialized entity travels between pods inside a *magic envelope* —
//! a signed (and optionally AES-encrypted) wrapper — which in turn is
//! embedded in one of two carrier documents:
//! - [`Slap`]: plaintext author id next to the envelope,
//! - [`EncryptedSlap`]: the envelope payload is encrypted and its cipher
//!   parameters plus the author id are delivered confidentially via a
//!   hybrid RSA/AES header.
//!
//! Send path: build an `Entity` → [`MagicEnvelope::new`] →
//! (optionally [`MagicEnvelope::encrypt`]) → [`Slap::generate`] or
//! [`EncryptedSlap::generate`]. Receive path mirrors it: `parse` the
//! document, then extract the entity with the author's verification key.
//!
//! Everything here is a synchronous, pure transformation; fresh random
//! material comes from the OS generator per message and is never reused.

mod cipher;
pub mod encoding;
mod encrypted_slap;
mod error;
mod keys;
mod magic_envelope;
mod slap;

pub use cipher::{AES_IV_SIZE, AES_KEY_SIZE, CipherParams, EncryptedPayload, aes_decrypt, aes_encrypt};
pub use encrypted_slap::EncryptedSlap;
pub use error::{SalmonError, SalmonResult};
pub use keys::{KeyPair, SigningKey, VerifyingKey};
pub use magic_envelope::{ALGORITHM, DATA_TYPE, ENCODING, MagicEnvelope};
pub use slap::Slap;
