mod common;

use common::{keypair, registry, test_entity};
use podwire_salmon::{EncryptedSlap, SalmonError, Slap, encoding};
use podwire_xml::{XmlNode, parse_document};
use pretty_assertions::assert_eq;

#[test]
fn generate_parse_entity_roundtrip() {
    let sender = keypair();
    let recipient = keypair();
    let registry = registry();
    let entity = test_entity(&registry);

    let document = EncryptedSlap::generate(
        "alice@pod.example",
        &sender.signing_key,
        &entity,
        &recipient.verifying_key,
    )
    .unwrap();

    let mut slap = EncryptedSlap::parse(&document, &recipient.signing_key).unwrap();
    assert_eq!(slap.author_id(), "alice@pod.example");

    let extracted = slap.entity(&registry, Some(&sender.verifying_key)).unwrap();
    assert_eq!(extracted.to_map(), entity.to_map());
}

#[test]
fn document_reveals_neither_author_nor_payload() {
    let sender = keypair();
    let recipient = keypair();
    let registry = registry();

    let document = EncryptedSlap::generate(
        "alice@pod.example",
        &sender.signing_key,
        &test_entity(&registry),
        &recipient.verifying_key,
    )
    .unwrap();

    assert!(!document.contains("alice@pod.example"));
    assert!(!document.contains("asdf"));
    assert!(document.contains("<encrypted_header>"));
}

#[test]
fn wrong_recipient_key_fails_before_any_signature_check() {
    let sender = keypair();
    let recipient = keypair();
    let intruder = keypair();
    let registry = registry();

    let document = EncryptedSlap::generate(
        "alice@pod.example",
        &sender.signing_key,
        &test_entity(&registry),
        &recipient.verifying_key,
    )
    .unwrap();

    let err = EncryptedSlap::parse(&document, &intruder.signing_key).unwrap_err();
    match err {
        SalmonError::Decryption(_) | SalmonError::Json(_) => {}
        other => panic!("expected a header unwrap failure, got: {other}"),
    }
}

#[test]
fn parse_without_header_fails() {
    let sender = keypair();
    let recipient = keypair();
    let registry = registry();
    // a plain slap has no encrypted header
    let document =
        Slap::generate("alice@pod.example", &sender.signing_key, &test_entity(&registry)).unwrap();

    assert!(matches!(
        EncryptedSlap::parse(&document, &recipient.signing_key),
        Err(SalmonError::MissingHeader)
    ));
}

#[test]
fn parse_without_envelope_fails() {
    let sender = keypair();
    let recipient = keypair();
    let registry = registry();

    let document = EncryptedSlap::generate(
        "alice@pod.example",
        &sender.signing_key,
        &test_entity(&registry),
        &recipient.verifying_key,
    )
    .unwrap();

    // rebuild the document with the envelope sibling removed
    let root = parse_document(&document).unwrap();
    let mut stripped = XmlNode::new(root.name());
    for (name, value) in root.attributes() {
        stripped.set_attribute(name.as_str(), value.as_str());
    }
    for child in root.children().iter().filter(|c| c.name() != "me:env") {
        stripped.append(child.clone());
    }

    assert!(matches!(
        EncryptedSlap::parse(&stripped.to_document_string(), &recipient.signing_key),
        Err(SalmonError::MissingMagicEnvelope)
    ));
}

#[test]
fn header_with_wrong_root_tag_is_invalid() {
    let recipient = keypair();

    // hand-build an encrypted header whose decrypted tree has the wrong
    // root tag
    let bogus_header = XmlNode::with_text("not_a_header", "x").to_xml_string();
    let encrypted = podwire_salmon::aes_encrypt(bogus_header.as_bytes());
    let key_json = serde_json::to_string(&encrypted.params).unwrap();
    let wrapped_key = encoding::encode(recipient.verifying_key.encrypt(key_json.as_bytes()).unwrap());
    let header_json = serde_json::json!({
        "aes_key": wrapped_key,
        "ciphertext": encrypted.ciphertext,
    });
    let content = encoding::encode(header_json.to_string().as_bytes());

    let document = format!(
        "<diaspora><encrypted_header>{content}</encrypted_header><me:env/></diaspora>"
    );
    assert!(matches!(
        EncryptedSlap::parse(&document, &recipient.signing_key),
        Err(SalmonError::InvalidHeader)
    ));
}

#[test]
fn first_entity_access_requires_a_key() {
    let sender = keypair();
    let recipient = keypair();
    let registry = registry();

    let document = EncryptedSlap::generate(
        "alice@pod.example",
        &sender.signing_key,
        &test_entity(&registry),
        &recipient.verifying_key,
    )
    .unwrap();

    let mut slap = EncryptedSlap::parse(&document, &recipient.signing_key).unwrap();
    assert!(matches!(
        slap.entity(&registry, None),
        Err(SalmonError::MissingVerificationKey)
    ));
}

#[test]
fn entity_is_cached_after_first_verification() {
    let sender = keypair();
    let recipient = keypair();
    let registry = registry();
    let entity = test_entity(&registry);

    let document = EncryptedSlap::generate(
        "alice@pod.example",
        &sender.signing_key,
        &entity,
        &recipient.verifying_key,
    )
    .unwrap();

    let mut slap = EncryptedSlap::parse(&document, &recipient.signing_key).unwrap();
    let first = slap
        .entity(&registry, Some(&sender.verifying_key))
        .unwrap()
        .clone();
    let second = slap.entity(&registry, None).unwrap();
    assert_eq!(first.to_map(), second.to_map());
}

#[test]
fn recovered_cipher_params_decrypt_the_envelope() {
    let sender = keypair();
    let recipient = keypair();
    let registry = registry();
    let entity = test_entity(&registry);

    let document = EncryptedSlap::generate(
        "alice@pod.example",
        &sender.signing_key,
        &entity,
        &recipient.verifying_key,
    )
    .unwrap();

    let slap = EncryptedSlap::parse(&document, &recipient.signing_key).unwrap();
    let params = slap.cipher_params();
    assert!(!params.key.is_empty());
    assert!(!params.iv.is_empty());

    let extracted = podwire_salmon::MagicEnvelope::unenvelop(
        slap.magic_envelope(),
        &sender.verifying_key,
        Some(params),
        &registry,
    )
    .unwrap();
    assert_eq!(extracted.to_map(), entity.to_map());
}
