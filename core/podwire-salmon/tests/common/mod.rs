use podwire_entity::{Entity, EntityRegistry, SchemaBuilder, Value};
use podwire_salmon::KeyPair;

/// Small keys keep the suite fast; the protocol itself is key-size
/// agnostic.
pub const TEST_KEY_BITS: usize = 1024;

pub fn keypair() -> KeyPair {
    KeyPair::generate(TEST_KEY_BITS).unwrap()
}

pub fn registry() -> EntityRegistry {
    let mut registry = EntityRegistry::new();
    registry
        .define(SchemaBuilder::new("TestEntity").property("test"))
        .unwrap();
    registry
}

pub fn test_entity(registry: &EntityRegistry) -> Entity {
    registry
        .construct(
            "TestEntity",
            vec![("test".to_string(), Value::from("asdf"))],
        )
        .unwrap()
}
