//! RSA key wrappers for envelope signing and header encryption.
//!
//! Signatures are PKCS#1 v1.5 over SHA-256 (the protocol's `RSA-SHA256`
//! token); header key wrapping uses PKCS#1 v1.5 encryption. Callers own
//! key storage and hand keys in as PEM.

use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPublicKey, EncodeRsaPublicKey};
use rsa::pkcs1v15::{
    Signature as RsaSignature, SigningKey as RsaSigningKey, VerifyingKey as RsaVerifyingKey,
};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::sha2::Sha256;
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};

use crate::error::{SalmonError, SalmonResult};

/// RSA private key. Signs envelopes and decrypts encrypted-slap headers.
#[derive(Clone)]
pub struct SigningKey(RsaPrivateKey);

/// RSA public key. Verifies envelope signatures and encrypts
/// encrypted-slap headers for a recipient.
#[derive(Clone)]
pub struct VerifyingKey(RsaPublicKey);

/// A private/public key pair.
pub struct KeyPair {
    pub signing_key: SigningKey,
    pub verifying_key: VerifyingKey,
}

impl KeyPair {
    /// Generates a fresh RSA key pair of the given size.
    pub fn generate(bits: usize) -> SalmonResult<Self> {
        let private = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| SalmonError::InvalidKey(e.to_string()))?;
        let public = RsaPublicKey::from(&private);
        Ok(Self {
            signing_key: SigningKey(private),
            verifying_key: VerifyingKey(public),
        })
    }
}

impl SigningKey {
    /// Parses a private key from PKCS#8 PEM.
    pub fn from_pkcs8_pem(pem: &str) -> SalmonResult<Self> {
        RsaPrivateKey::from_pkcs8_pem(pem)
            .map(Self)
            .map_err(|e| SalmonError::InvalidKey(e.to_string()))
    }

    /// Serializes the private key to PKCS#8 PEM.
    pub fn to_pkcs8_pem(&self) -> SalmonResult<String> {
        self.0
            .to_pkcs8_pem(LineEnding::LF)
            .map(|pem| pem.to_string())
            .map_err(|e| SalmonError::InvalidKey(e.to_string()))
    }

    /// Signs a message, returning the raw signature bytes.
    pub fn sign(&self, message: &[u8]) -> SalmonResult<Vec<u8>> {
        let signer = RsaSigningKey::<Sha256>::new(self.0.clone());
        signer
            .try_sign(message)
            .map(|signature| signature.to_vec())
            .map_err(|e| SalmonError::Signing(e.to_string()))
    }

    /// Decrypts a blob that was encrypted for this key's public half.
    pub fn decrypt(&self, ciphertext: &[u8]) -> SalmonResult<Vec<u8>> {
        self.0
            .decrypt(Pkcs1v15Encrypt, ciphertext)
            .map_err(|e| SalmonError::Decryption(e.to_string()))
    }

    /// Returns the corresponding verification key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(RsaPublicKey::from(&self.0))
    }
}

impl VerifyingKey {
    /// Parses a public key from SPKI PEM (`BEGIN PUBLIC KEY`).
    pub fn from_public_key_pem(pem: &str) -> SalmonResult<Self> {
        RsaPublicKey::from_public_key_pem(pem)
            .map(Self)
            .map_err(|e| SalmonError::InvalidKey(e.to_string()))
    }

    /// Parses a public key from the legacy PKCS#1 PEM pods export
    /// (`BEGIN RSA PUBLIC KEY`).
    pub fn from_pkcs1_pem(pem: &str) -> SalmonResult<Self> {
        RsaPublicKey::from_pkcs1_pem(pem)
            .map(Self)
            .map_err(|e| SalmonError::InvalidKey(e.to_string()))
    }

    /// Serializes the public key to SPKI PEM.
    pub fn to_public_key_pem(&self) -> SalmonResult<String> {
        self.0
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| SalmonError::InvalidKey(e.to_string()))
    }

    /// Serializes the public key to the legacy PKCS#1 PEM form.
    pub fn to_pkcs1_pem(&self) -> SalmonResult<String> {
        self.0
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| SalmonError::InvalidKey(e.to_string()))
    }

    /// Verifies a signature against a message.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> SalmonResult<()> {
        let verifier = RsaVerifyingKey::<Sha256>::new(self.0.clone());
        let signature =
            RsaSignature::try_from(signature).map_err(|_| SalmonError::InvalidSignature)?;
        verifier
            .verify(message, &signature)
            .map_err(|_| SalmonError::InvalidSignature)
    }

    /// Encrypts a blob for the holder of the private half.
    pub fn encrypt(&self, plaintext: &[u8]) -> SalmonResult<Vec<u8>> {
        self.0
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, plaintext)
            .map_err(|e| SalmonError::Encryption(e.to_string()))
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey").field("key", &"[REDACTED]").finish()
    }
}

impl std::fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifyingKey").finish_non_exhaustive()
    }
}
