use podwire_entity::{EntityError, EntityRegistry, SchemaBuilder, Value};
use pretty_assertions::assert_eq;

fn registry() -> EntityRegistry {
    let mut registry = EntityRegistry::new();
    registry
        .define(
            SchemaBuilder::new("TestEntity")
                .property("a")
                .property("b")
                .defaulted("c", "true"),
        )
        .unwrap();
    registry
        .define(
            SchemaBuilder::new("NestedTest")
                .property("asdf")
                .child("other", "TestEntity")
                .child_list("many", "TestEntity"),
        )
        .unwrap();
    registry
}

fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, Value)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect()
}

// ── construction ─────────────────────────────────────────────────

#[test]
fn construct_sets_properties() {
    let registry = registry();
    let entity = registry
        .construct("TestEntity", attrs(&[("a", "1"), ("b", "2")]))
        .unwrap();
    assert_eq!(entity.text("a"), Some("1"));
    assert_eq!(entity.text("b"), Some("2"));
}

#[test]
fn missing_required_properties_are_all_named() {
    let registry = registry();
    let err = registry
        .construct("TestEntity", attrs(&[("a", "1")]))
        .unwrap_err();
    match err {
        EntityError::MissingRequiredProperties { entity_type, names } => {
            assert_eq!(entity_type, "TestEntity");
            assert_eq!(names, vec!["b".to_string()]);
        }
        other => panic!("wrong error: {other}"),
    }
}

#[test]
fn defaults_resolve_for_absent_optionals() {
    let registry = registry();
    let entity = registry
        .construct("TestEntity", attrs(&[("a", "1"), ("b", "2")]))
        .unwrap();
    assert_eq!(entity.text("c"), Some("true"));
}

#[test]
fn supplied_value_overrides_default() {
    let registry = registry();
    let entity = registry
        .construct("TestEntity", attrs(&[("a", "1"), ("b", "2"), ("c", "false")]))
        .unwrap();
    assert_eq!(entity.text("c"), Some("false"));
}

#[test]
fn undeclared_attributes_are_discarded() {
    let registry = registry();
    let entity = registry
        .construct(
            "TestEntity",
            attrs(&[("a", "1"), ("b", "2"), ("zzz", "ignored")]),
        )
        .unwrap();
    assert!(entity.get("zzz").is_none());
}

#[test]
fn explicit_nil_counts_as_absent() {
    let registry = registry();
    let err = registry
        .construct(
            "TestEntity",
            vec![
                ("a".to_string(), Value::from("1")),
                ("b".to_string(), Value::Nil),
            ],
        )
        .unwrap_err();
    assert!(matches!(
        err,
        EntityError::MissingRequiredProperties { .. }
    ));
}

#[test]
fn primitive_inputs_normalize_to_wire_text() {
    let registry = registry();
    let entity = registry
        .construct(
            "TestEntity",
            vec![
                ("a".to_string(), Value::from(1234i64)),
                ("b".to_string(), Value::from(false)),
            ],
        )
        .unwrap();
    assert_eq!(entity.text("a"), Some("1234"));
    assert_eq!(entity.text("b"), Some("false"));
}

#[test]
fn unknown_type_fails() {
    let registry = registry();
    assert!(matches!(
        registry.construct("NoSuchType", attrs(&[])),
        Err(EntityError::UnknownEntityType(_))
    ));
}

// ── nested entities ──────────────────────────────────────────────

#[test]
fn nested_entities_are_type_checked() {
    let registry = registry();
    let inner = registry
        .construct("TestEntity", attrs(&[("a", "1"), ("b", "2")]))
        .unwrap();
    let outer = registry
        .construct(
            "NestedTest",
            vec![
                ("asdf".to_string(), Value::from("x")),
                ("other".to_string(), Value::from(inner.clone())),
                ("many".to_string(), Value::from(vec![inner.clone(), inner])),
            ],
        )
        .unwrap();
    assert_eq!(
        outer.get("other").and_then(Value::as_entity).map(|e| e.entity_type()),
        Some("TestEntity")
    );
    assert_eq!(
        outer.get("many").and_then(Value::as_entity_list).map(<[_]>::len),
        Some(2)
    );
}

#[test]
fn wrong_nested_type_is_caller_misuse() {
    let mut registry = registry();
    registry
        .define(SchemaBuilder::new("OtherEntity").property("x"))
        .unwrap();
    let wrong = registry
        .construct("OtherEntity", attrs(&[("x", "1")]))
        .unwrap();
    let err = registry
        .construct(
            "NestedTest",
            vec![
                ("asdf".to_string(), Value::from("x")),
                ("other".to_string(), Value::from(wrong)),
            ],
        )
        .unwrap_err();
    assert!(matches!(err, EntityError::UnexpectedValueType { .. }));
}

#[test]
fn scalar_property_rejects_entity_value() {
    let registry = registry();
    let inner = registry
        .construct("TestEntity", attrs(&[("a", "1"), ("b", "2")]))
        .unwrap();
    let err = registry
        .construct(
            "TestEntity",
            vec![
                ("a".to_string(), Value::from(inner)),
                ("b".to_string(), Value::from("2")),
            ],
        )
        .unwrap_err();
    assert!(matches!(err, EntityError::UnexpectedValueType { .. }));
}

// ── to_map round-trip law ────────────────────────────────────────

#[test]
fn to_map_reconstructs_equal_entity() {
    let registry = registry();
    let inner = registry
        .construct("TestEntity", attrs(&[("a", "1"), ("b", "2")]))
        .unwrap();
    let outer = registry
        .construct(
            "NestedTest",
            vec![
                ("asdf".to_string(), Value::from("x")),
                ("other".to_string(), Value::from(inner.clone())),
                ("many".to_string(), Value::from(vec![inner])),
            ],
        )
        .unwrap();

    let rebuilt = registry.construct("NestedTest", outer.to_map()).unwrap();
    assert_eq!(rebuilt, outer);
    assert_eq!(rebuilt.to_map(), outer.to_map());
}

#[test]
fn to_map_includes_resolved_defaults() {
    let registry = registry();
    let entity = registry
        .construct("TestEntity", attrs(&[("a", "1"), ("b", "2")]))
        .unwrap();
    let map = entity.to_map();
    assert_eq!(map.get("c"), Some(&Value::from("true")));
}

// ── schema validation ────────────────────────────────────────────

#[test]
fn invalid_property_name_is_rejected() {
    let mut registry = EntityRegistry::new();
    let err = registry
        .define(SchemaBuilder::new("Broken").property("Not-An-Identifier"))
        .unwrap_err();
    assert!(matches!(err, EntityError::InvalidSchema { .. }));
}

#[test]
fn duplicate_property_is_rejected() {
    let mut registry = EntityRegistry::new();
    let err = registry
        .define(SchemaBuilder::new("Broken").property("a").property("a"))
        .unwrap_err();
    assert!(matches!(err, EntityError::InvalidSchema { .. }));
}

#[test]
fn unknown_nested_type_is_rejected() {
    let mut registry = EntityRegistry::new();
    let err = registry
        .define(SchemaBuilder::new("Broken").child("inner", "Missing"))
        .unwrap_err();
    assert!(matches!(err, EntityError::InvalidSchema { .. }));
}

#[test]
fn duplicate_type_registration_is_rejected() {
    let mut registry = registry();
    let err = registry
        .define(SchemaBuilder::new("TestEntity").property("a"))
        .unwrap_err();
    assert!(matches!(err, EntityError::InvalidSchema { .. }));
}
