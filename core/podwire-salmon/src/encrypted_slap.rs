//! The encrypted slap: hybrid-encrypted header plus an encrypted envelope.
//!
//! Asymmetric encryption is slow and messages vary greatly in size, so
//! only a small header travels under RSA; everything bulky is AES:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <diaspora xmlns="https://joindiaspora.com/protocol"
//!           xmlns:me="http://salmon-protocol.org/ns/magic-env">
//!   <encrypted_header>{encrypted_header}</encrypted_header>
//!   {magic_envelope with encrypted data}
//! </diaspora>
//! ```
//!
//! The `encrypted_header` content is the opaque-encoded JSON
//! `{"aes_key": ..., "ciphertext": ...}`: `aes_key` is the RSA-encrypted
//! JSON `{"key": ..., "iv": ...}` for the header cipher, and `ciphertext`
//! is the AES-encrypted header document
//!
//! ```xml
//! <decrypted_header>
//!   <iv>{iv}</iv>
//!   <aes_key>{aes_key}</aes_key>
//!   <author_id>{author_id}</author_id>
//! </decrypted_header>
//! ```
//!
//! whose `aes_key`/`iv` decrypt the magic envelope's payload. The
//! envelope signature is verified before that payload is ever touched.

use serde::{Deserialize, Serialize};
use tracing::debug;

use podwire_entity::{Entity, EntityRegistry};
use podwire_xml::{XmlNode, ensure_declaration, parse_document};

use crate::cipher::{self, CipherParams};
use crate::encoding;
use crate::error::{SalmonError, SalmonResult};
use crate::keys::{SigningKey, VerifyingKey};
use crate::magic_envelope::MagicEnvelope;
use crate::slap::{AUTHOR_TAG, ENVELOPE_TAG, MAGIC_ENV_NS, PROTOCOL_NS, ROOT_TAG};

const ENCRYPTED_HEADER_TAG: &str = "encrypted_header";
const DECRYPTED_HEADER_TAG: &str = "decrypted_header";
const IV_TAG: &str = "iv";
const AES_KEY_TAG: &str = "aes_key";

/// The outer JSON blob inside `encrypted_header`.
#[derive(Serialize, Deserialize)]
struct EncryptedHeader {
    aes_key: String,
    ciphertext: String,
}

/// A parsed encrypted slap: author id, envelope cipher parameters and the
/// (not yet verified) envelope.
#[derive(Debug)]
pub struct EncryptedSlap {
    author_id: String,
    cipher_params: CipherParams,
    magic_envelope: XmlNode,
    entity: Option<Entity>,
}

impl EncryptedSlap {
    /// Builds an encrypted, signed slap document around one entity.
    ///
    /// The envelope payload is encrypted with the sender's fresh AES
    /// parameters; those parameters and the author id travel in a header
    /// only `recipient_key`'s owner can open.
    pub fn generate(
        author_id: &str,
        sender_key: &SigningKey,
        entity: &Entity,
        recipient_key: &VerifyingKey,
    ) -> SalmonResult<String> {
        let mut envelope = MagicEnvelope::new(sender_key, entity);
        let envelope_params = envelope.encrypt();

        let mut root = XmlNode::new(ROOT_TAG);
        root.set_attribute("xmlns", PROTOCOL_NS);
        root.set_attribute("xmlns:me", MAGIC_ENV_NS);
        root.append(encrypted_header(author_id, &envelope_params, recipient_key)?);
        root.append(envelope.envelop()?);

        debug!(author_id, entity_type = entity.entity_type(), "encrypted slap generated");
        Ok(root.to_document_string())
    }

    /// Parses an encrypted slap document, opening the header with the
    /// recipient's private key. Entity extraction stays deferred.
    ///
    /// With the wrong private key this fails at the RSA or JSON step —
    /// before any signature is looked at.
    pub fn parse(document: &str, recipient_key: &SigningKey) -> SalmonResult<Self> {
        let root = parse_document(&ensure_declaration(document))?;

        let header_node = root
            .child(ENCRYPTED_HEADER_TAG)
            .ok_or(SalmonError::MissingHeader)?;
        let (author_id, cipher_params) =
            decrypt_header(header_node.text().unwrap_or(""), recipient_key)?;

        let magic_envelope = root
            .child(ENVELOPE_TAG)
            .ok_or(SalmonError::MissingMagicEnvelope)?
            .clone();

        debug!(%author_id, "encrypted slap parsed");
        Ok(Self {
            author_id,
            cipher_params,
            magic_envelope,
            entity: None,
        })
    }

    /// The sender's federation handle, recovered from the header.
    pub fn author_id(&self) -> &str {
        &self.author_id
    }

    /// The envelope cipher parameters recovered from the header.
    pub fn cipher_params(&self) -> &CipherParams {
        &self.cipher_params
    }

    /// The embedded envelope node.
    pub fn magic_envelope(&self) -> &XmlNode {
        &self.magic_envelope
    }

    /// Verifies the envelope, decrypts its payload with the header's
    /// cipher parameters and returns the entity.
    ///
    /// Same caching contract as [`crate::Slap::entity`]: the first call
    /// must supply the author's verification key.
    pub fn entity(
        &mut self,
        registry: &EntityRegistry,
        verification_key: Option<&VerifyingKey>,
    ) -> SalmonResult<&Entity> {
        let entity = match self.entity.take() {
            Some(entity) => entity,
            None => {
                let key = verification_key.ok_or(SalmonError::MissingVerificationKey)?;
                MagicEnvelope::unenvelop(
                    &self.magic_envelope,
                    key,
                    Some(&self.cipher_params),
                    registry,
                )?
            }
        };
        Ok(self.entity.insert(entity))
    }
}

/// Builds the `encrypted_header` element for the given envelope cipher
/// parameters.
fn encrypted_header(
    author_id: &str,
    envelope_params: &CipherParams,
    recipient_key: &VerifyingKey,
) -> SalmonResult<XmlNode> {
    let header_text = header_xml(author_id, envelope_params);
    let encrypted = cipher::aes_encrypt(header_text.as_bytes());

    let key_json = serde_json::to_string(&encrypted.params)?;
    let wrapped_key = encoding::encode(recipient_key.encrypt(key_json.as_bytes())?);

    let header_json = serde_json::to_string(&EncryptedHeader {
        aes_key: wrapped_key,
        ciphertext: encrypted.ciphertext,
    })?;
    Ok(XmlNode::with_text(
        ENCRYPTED_HEADER_TAG,
        encoding::encode(header_json.as_bytes()),
    ))
}

/// Serializes the plaintext header document.
fn header_xml(author_id: &str, envelope_params: &CipherParams) -> String {
    let mut header = XmlNode::new(DECRYPTED_HEADER_TAG);
    header.append(XmlNode::with_text(IV_TAG, envelope_params.iv.as_str()));
    header.append(XmlNode::with_text(AES_KEY_TAG, envelope_params.key.as_str()));
    header.append(XmlNode::with_text(AUTHOR_TAG, author_id));
    header.to_xml_string()
}

/// Opens an `encrypted_header` content blob with the recipient's private
/// key, returning the author id and the envelope cipher parameters.
fn decrypt_header(content: &str, recipient_key: &SigningKey) -> SalmonResult<(String, CipherParams)> {
    let header: EncryptedHeader = serde_json::from_slice(&encoding::decode(content)?)?;

    let key_json = recipient_key.decrypt(&encoding::decode(&header.aes_key)?)?;
    let header_params: CipherParams = serde_json::from_slice(&key_json)?;

    let header_text = cipher::aes_decrypt(
        &header.ciphertext,
        &header_params.key,
        &header_params.iv,
    )?;
    let header_tree = parse_document(&String::from_utf8_lossy(&header_text))?;
    if header_tree.name() != DECRYPTED_HEADER_TAG {
        return Err(SalmonError::InvalidHeader);
    }

    let iv = header_child(&header_tree, IV_TAG)?;
    let key = header_child(&header_tree, AES_KEY_TAG)?;
    let author_id = header_child(&header_tree, AUTHOR_TAG)?;
    Ok((
        author_id.to_string(),
        CipherParams {
            key: key.to_string(),
            iv: iv.to_string(),
        },
    ))
}

fn header_child<'a>(header: &'a XmlNode, tag: &str) -> SalmonResult<&'a str> {
    header
        .child(tag)
        .and_then(XmlNode::text)
        .ok_or(SalmonError::InvalidHeader)
}
