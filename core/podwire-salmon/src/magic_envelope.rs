//! The magic envelope: a signed, optionally encrypted entity wrapper.
//!
//! On the wire an envelope looks like so:
//!
//! ```xml
//! <me:env>
//!   <me:data type='application/xml'>{data}</me:data>
//!   <me:encoding>base64url</me:encoding>
//!   <me:alg>RSA-SHA256</me:alg>
//!   <me:sig>{signature}</me:sig>
//! </me:env>
//! ```
//!
//! The signature covers the canonical signing subject: the opaque
//! encodings of [payload, data type, encoding, algorithm], joined with
//! `.`, in exactly that order. Verifier and signer must reconstruct the
//! subject byte for byte.

use tracing::warn;

use podwire_entity::{Entity, EntityRegistry, XmlPayload};
use podwire_xml::{XmlNode, parse_document};

use crate::cipher::{self, CipherParams};
use crate::encoding;
use crate::error::{SalmonError, SalmonResult};
use crate::keys::{SigningKey, VerifyingKey};

/// Encoding token carried in `me:encoding`.
pub const ENCODING: &str = "base64url";

/// Signature scheme token carried in `me:alg`.
pub const ALGORITHM: &str = "RSA-SHA256";

/// Payload MIME type carried on `me:data`.
pub const DATA_TYPE: &str = "application/xml";

const ENVELOPE_TAG: &str = "me:env";
const DATA_TAG: &str = "me:data";
const ENCODING_TAG: &str = "me:encoding";
const ALGORITHM_TAG: &str = "me:alg";
const SIGNATURE_TAG: &str = "me:sig";

/// A per-message envelope: created around one entity, optionally
/// encrypted, then enveloped exactly once.
pub struct MagicEnvelope {
    signing_key: SigningKey,
    payload: String,
}

impl MagicEnvelope {
    /// Serializes the wrapped entity and stores it as the plaintext
    /// payload.
    pub fn new(signing_key: &SigningKey, entity: &Entity) -> Self {
        Self {
            signing_key: signing_key.clone(),
            payload: XmlPayload::pack(entity).to_xml_string(),
        }
    }

    /// The current payload: plaintext XML, or opaque-encoded ciphertext
    /// after [`MagicEnvelope::encrypt`].
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Encrypts the current payload under a fresh AES key and IV and
    /// returns the cipher parameters the recipient will need.
    ///
    /// Must be called before [`MagicEnvelope::envelop`]. Calling it twice
    /// re-encrypts the already-encrypted payload — the result is a
    /// payload no receiver can use, and this method does not guard
    /// against it.
    pub fn encrypt(&mut self) -> CipherParams {
        let encrypted = cipher::aes_encrypt(self.payload.as_bytes());
        self.payload = encrypted.ciphertext;
        encrypted.params
    }

    /// Builds the signed envelope node around the current payload.
    pub fn envelop(&self) -> SalmonResult<XmlNode> {
        let mut envelope = XmlNode::new(ENVELOPE_TAG);

        let mut data = XmlNode::new(DATA_TAG);
        data.set_attribute("type", DATA_TYPE);
        data.set_text(encoding::encode(self.payload.as_bytes()));
        envelope.append(data);

        envelope.append(XmlNode::with_text(ENCODING_TAG, ENCODING));
        envelope.append(XmlNode::with_text(ALGORITHM_TAG, ALGORITHM));

        let subject = signing_subject(&[
            self.payload.as_bytes(),
            DATA_TYPE.as_bytes(),
            ENCODING.as_bytes(),
            ALGORITHM.as_bytes(),
        ]);
        let signature = self.signing_key.sign(subject.as_bytes())?;
        envelope.append(XmlNode::with_text(SIGNATURE_TAG, encoding::encode(&signature)));

        Ok(envelope)
    }

    /// Verifies an envelope node and extracts the entity inside.
    ///
    /// Checks run in a fixed order: structure, signature, encoding token,
    /// algorithm token, then payload decoding (and decryption when
    /// `cipher_params` is given) and entity reconstruction.
    pub fn unenvelop(
        envelope: &XmlNode,
        verification_key: &VerifyingKey,
        cipher_params: Option<&CipherParams>,
        registry: &EntityRegistry,
    ) -> SalmonResult<Entity> {
        if !envelope_valid(envelope) {
            return Err(SalmonError::InvalidEnvelope);
        }

        let data_node = envelope.child(DATA_TAG).ok_or(SalmonError::InvalidEnvelope)?;
        let payload = encoding::decode(data_node.text().unwrap_or(""))?;
        let data_type = data_node.attribute("type").unwrap_or("");
        let encoding_token = child_text(envelope, ENCODING_TAG);
        let algorithm_token = child_text(envelope, ALGORITHM_TAG);

        let subject = signing_subject(&[
            &payload,
            data_type.as_bytes(),
            encoding_token.as_bytes(),
            algorithm_token.as_bytes(),
        ]);
        let signature = encoding::decode(child_text(envelope, SIGNATURE_TAG))?;
        if let Err(error) = verification_key.verify(subject.as_bytes(), &signature) {
            warn!("envelope signature rejected");
            return Err(error);
        }

        if encoding_token != ENCODING {
            return Err(SalmonError::InvalidEncoding(encoding_token.to_string()));
        }
        if algorithm_token != ALGORITHM {
            return Err(SalmonError::InvalidAlgorithm(algorithm_token.to_string()));
        }

        let payload = match cipher_params {
            Some(params) => {
                let ciphertext = String::from_utf8_lossy(&payload).into_owned();
                cipher::aes_decrypt(&ciphertext, &params.key, &params.iv)?
            }
            None => payload,
        };

        let document = String::from_utf8_lossy(&payload).into_owned();
        let tree = parse_document(&document)?;
        Ok(XmlPayload::unpack(&tree, registry)?)
    }
}

/// Builds the canonical signing subject from its four components.
fn signing_subject(parts: &[&[u8]]) -> String {
    parts
        .iter()
        .map(|part| encoding::encode(part))
        .collect::<Vec<_>>()
        .join(".")
}

fn envelope_valid(envelope: &XmlNode) -> bool {
    envelope.name() == ENVELOPE_TAG
        && envelope.children().len() == 4
        && envelope.child(DATA_TAG).is_some()
        && envelope.child(ENCODING_TAG).is_some()
        && envelope.child(ALGORITHM_TAG).is_some()
        && envelope.child(SIGNATURE_TAG).is_some()
}

fn child_text<'a>(node: &'a XmlNode, tag: &str) -> &'a str {
    node.child(tag).and_then(XmlNode::text).unwrap_or("")
}
