use podwire_entity::{PropertyMap, Value};

use crate::rules::Rule;

/// One failed check: which field broke which rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub rule: &'static str,
}

/// The outcome of validating one attribute map.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Every failed (field, rule) pair, in rule declaration order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

/// A per-entity-type table of field rules.
///
/// Validation never mutates or constructs anything; it reads scalar
/// values out of the attribute map (a missing or nested value counts as
/// empty text) and reports every rule that fails.
#[derive(Debug, Clone)]
pub struct Validator {
    entity_type: String,
    rules: Vec<(String, Vec<Rule>)>,
}

impl Validator {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            rules: Vec::new(),
        }
    }

    /// The entity type this table belongs to.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Declares the rules for one field.
    pub fn rule(mut self, field: &str, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.push((field.into(), rules.into_iter().collect()));
        self
    }

    /// Checks every declared rule against the attribute map.
    pub fn validate(&self, attributes: &PropertyMap) -> ValidationResult {
        let mut result = ValidationResult::default();
        for (field, rules) in &self.rules {
            let value = attributes
                .get(field)
                .and_then(Value::as_text)
                .unwrap_or("");
            for rule in rules {
                if !rule.check(value) {
                    result.errors.push(FieldError {
                        field: field.clone(),
                        rule: rule.error_key(),
                    });
                }
            }
        }
        result
    }
}
