//! AES-256-CBC helpers for envelope and header encryption.
//!
//! Every call to [`aes_encrypt`] draws a fresh key and IV from the OS
//! generator; nothing is ever reused across messages. All parameters
//! cross this boundary opaque-encoded (see [`crate::encoding`]).

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::encoding;
use crate::error::{SalmonError, SalmonResult};

/// AES-256 key size in bytes.
pub const AES_KEY_SIZE: usize = 32;

/// AES-CBC initialization vector size in bytes.
pub const AES_IV_SIZE: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// One message's symmetric cipher parameters, opaque-encoded for
/// embedding on the wire. Also the shape of the JSON key blob inside an
/// encrypted slap header.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherParams {
    pub key: String,
    pub iv: String,
}

impl std::fmt::Debug for CipherParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherParams")
            .field("key", &"[REDACTED]")
            .field("iv", &self.iv)
            .finish()
    }
}

/// Result of one symmetric encryption: the ciphertext plus the cipher
/// parameters that decrypt it, all opaque-encoded.
#[derive(Debug, Clone)]
pub struct EncryptedPayload {
    pub params: CipherParams,
    pub ciphertext: String,
}

/// Encrypts `plaintext` under a fresh random AES-256-CBC key and IV.
pub fn aes_encrypt(plaintext: &[u8]) -> EncryptedPayload {
    let mut key = [0u8; AES_KEY_SIZE];
    let mut iv = [0u8; AES_IV_SIZE];
    OsRng.fill_bytes(&mut key);
    OsRng.fill_bytes(&mut iv);

    let ciphertext =
        Aes256CbcEnc::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let payload = EncryptedPayload {
        params: CipherParams {
            key: encoding::encode(key),
            iv: encoding::encode(iv),
        },
        ciphertext: encoding::encode(&ciphertext),
    };
    key.zeroize();
    payload
}

/// Decrypts an opaque-encoded ciphertext with opaque-encoded key and IV.
///
/// Every failure along the way — bad encoding, wrong lengths, bad padding
/// from a wrong key — surfaces as [`SalmonError::Decryption`].
pub fn aes_decrypt(ciphertext: &str, key: &str, iv: &str) -> SalmonResult<Vec<u8>> {
    let ciphertext = decode_field(ciphertext, "ciphertext")?;
    let key = decode_field(key, "key")?;
    let iv = decode_field(iv, "iv")?;

    let decryptor = Aes256CbcDec::new_from_slices(&key, &iv)
        .map_err(|_| SalmonError::Decryption("invalid key or iv length".into()))?;
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| SalmonError::Decryption("bad padding (wrong key or corrupt data)".into()))
}

fn decode_field(value: &str, field: &str) -> SalmonResult<Vec<u8>> {
    encoding::decode(value)
        .map_err(|e| SalmonError::Decryption(format!("{field} is not valid opaque encoding: {e}")))
}
