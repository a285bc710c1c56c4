use podwire_entity::{EntityError, Value, XmlPayload, catalog};
use podwire_xml::{XmlNode, parse_document};
use pretty_assertions::assert_eq;

fn test_entity() -> (podwire_entity::EntityRegistry, podwire_entity::Entity) {
    let registry = catalog::registry().unwrap();
    let entity = registry
        .construct(
            "AccountDeletion",
            vec![(
                "diaspora_handle".to_string(),
                Value::from("alice@pod.example"),
            )],
        )
        .unwrap();
    (registry, entity)
}

#[test]
fn pack_produces_the_legacy_shape() {
    let (_, entity) = test_entity();
    let node = XmlPayload::pack(&entity);
    assert_eq!(
        node.to_xml_string(),
        "<XML><post><account_deletion>\
         <diaspora_handle>alice@pod.example</diaspora_handle>\
         </account_deletion></post></XML>"
    );
}

#[test]
fn pack_unpack_roundtrip() {
    let (registry, entity) = test_entity();
    let unpacked = XmlPayload::unpack(&XmlPayload::pack(&entity), &registry).unwrap();
    assert_eq!(unpacked.to_map(), entity.to_map());
}

#[test]
fn pack_unpack_roundtrip_with_nesting() {
    let registry = catalog::registry().unwrap();
    let profile = registry
        .construct(
            "Profile",
            vec![(
                "diaspora_handle".to_string(),
                Value::from("bob@pod.example"),
            )],
        )
        .unwrap();
    let person = registry
        .construct(
            "Person",
            vec![
                ("guid".to_string(), Value::from("abcdef1234567890")),
                ("diaspora_handle".to_string(), Value::from("bob@pod.example")),
                ("url".to_string(), Value::from("https://pod.example/")),
                ("profile".to_string(), Value::from(profile)),
                ("exported_key".to_string(), Value::from("KEY")),
            ],
        )
        .unwrap();

    let unpacked = XmlPayload::unpack(&XmlPayload::pack(&person), &registry).unwrap();
    assert_eq!(unpacked.to_map(), person.to_map());
}

#[test]
fn unpack_rejects_wrong_outer_tag() {
    let (registry, _) = test_entity();
    let node = parse_document("<NOTXML><post><account_deletion/></post></NOTXML>").unwrap();
    assert!(matches!(
        XmlPayload::unpack(&node, &registry),
        Err(EntityError::InvalidStructure)
    ));
}

#[test]
fn unpack_rejects_wrong_inner_tag() {
    let (registry, _) = test_entity();
    let node = parse_document("<XML><comment><account_deletion/></comment></XML>").unwrap();
    assert!(matches!(
        XmlPayload::unpack(&node, &registry),
        Err(EntityError::InvalidStructure)
    ));
}

#[test]
fn unpack_rejects_missing_entity() {
    let (registry, _) = test_entity();
    let node = parse_document("<XML><post/></XML>").unwrap();
    assert!(matches!(
        XmlPayload::unpack(&node, &registry),
        Err(EntityError::InvalidStructure)
    ));
}

#[test]
fn unpack_rejects_extra_siblings() {
    let (registry, _) = test_entity();
    let mut outer = XmlNode::new("XML");
    let mut post = XmlNode::new("post");
    post.append(XmlNode::new("account_deletion"));
    outer.append(post.clone());
    outer.append(post);
    assert!(matches!(
        XmlPayload::unpack(&outer, &registry),
        Err(EntityError::InvalidStructure)
    ));
}

#[test]
fn unpack_rejects_unknown_entity_tag() {
    let (registry, _) = test_entity();
    let node = parse_document("<XML><post><mystery_entity/></post></XML>").unwrap();
    assert!(matches!(
        XmlPayload::unpack(&node, &registry),
        Err(EntityError::UnknownEntityType(_))
    ));
}
