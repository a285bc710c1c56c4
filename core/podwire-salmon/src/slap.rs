//! The plaintext slap: author id next to a magic envelope.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <diaspora xmlns="https://joindiaspora.com/protocol"
//!           xmlns:me="http://salmon-protocol.org/ns/magic-env">
//!   <header>
//!     <author_id>{author}</author_id>
//!   </header>
//!   {magic_envelope}
//! </diaspora>
//! ```

use tracing::debug;

use podwire_entity::{Entity, EntityRegistry};
use podwire_xml::{XmlNode, ensure_declaration, parse_document};

use crate::error::{SalmonError, SalmonResult};
use crate::keys::{SigningKey, VerifyingKey};
use crate::magic_envelope::MagicEnvelope;

pub(crate) const ROOT_TAG: &str = "diaspora";
pub(crate) const HEADER_TAG: &str = "header";
pub(crate) const AUTHOR_TAG: &str = "author_id";
pub(crate) const ENVELOPE_TAG: &str = "me:env";

pub(crate) const PROTOCOL_NS: &str = "https://joindiaspora.com/protocol";
pub(crate) const MAGIC_ENV_NS: &str = "http://salmon-protocol.org/ns/magic-env";

/// A parsed slap document: author id plus the (not yet verified)
/// envelope. The entity is extracted lazily because verification needs
/// the author's public key, which the caller usually has to fetch first.
#[derive(Debug)]
pub struct Slap {
    author_id: String,
    magic_envelope: XmlNode,
    entity: Option<Entity>,
}

impl Slap {
    /// Builds and signs a slap document around one entity.
    pub fn generate(
        author_id: &str,
        signing_key: &SigningKey,
        entity: &Entity,
    ) -> SalmonResult<String> {
        let mut root = XmlNode::new(ROOT_TAG);
        root.set_attribute("xmlns", PROTOCOL_NS);
        root.set_attribute("xmlns:me", MAGIC_ENV_NS);

        let mut header = XmlNode::new(HEADER_TAG);
        header.append(XmlNode::with_text(AUTHOR_TAG, author_id));
        root.append(header);

        root.append(MagicEnvelope::new(signing_key, entity).envelop()?);

        debug!(author_id, entity_type = entity.entity_type(), "slap generated");
        Ok(root.to_document_string())
    }

    /// Parses a slap document, deferring entity extraction.
    ///
    /// A missing XML declaration is tolerated; a missing author or
    /// envelope is not.
    pub fn parse(document: &str) -> SalmonResult<Self> {
        let root = parse_document(&ensure_declaration(document))?;

        let author_id = root
            .locate(&format!("{HEADER_TAG}/{AUTHOR_TAG}"))
            .ok_or(SalmonError::MissingAuthor)?
            .text()
            .unwrap_or("")
            .to_string();

        let magic_envelope = root
            .child(ENVELOPE_TAG)
            .ok_or(SalmonError::MissingMagicEnvelope)?
            .clone();

        debug!(%author_id, "slap parsed");
        Ok(Self {
            author_id,
            magic_envelope,
            entity: None,
        })
    }

    /// The sender's federation handle.
    pub fn author_id(&self) -> &str {
        &self.author_id
    }

    /// The embedded envelope node.
    pub fn magic_envelope(&self) -> &XmlNode {
        &self.magic_envelope
    }

    /// Verifies the envelope and returns the entity.
    ///
    /// The first call must supply the author's verification key and
    /// caches the result; later calls return the cached entity whether or
    /// not a key is supplied.
    pub fn entity(
        &mut self,
        registry: &EntityRegistry,
        verification_key: Option<&VerifyingKey>,
    ) -> SalmonResult<&Entity> {
        let entity = match self.entity.take() {
            Some(entity) => entity,
            None => {
                let key = verification_key.ok_or(SalmonError::MissingVerificationKey)?;
                MagicEnvelope::unenvelop(&self.magic_envelope, key, None, registry)?
            }
        };
        Ok(self.entity.insert(entity))
    }
}
