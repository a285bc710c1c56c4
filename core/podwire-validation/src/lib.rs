//! Rule-based field validation for federation entities.
//!
//! Callers run these semantic checks on an attribute map *before* handing
//! it to entity construction; the core serialization and envelope layers
//! never invoke them. A [`Validator`] is a plain table of per-field
//! [`Rule`] lists; [`catalog::validator_for`] returns the built-in table
//! for each built-in entity type.

pub mod catalog;
mod rules;
mod validator;

pub use rules::Rule;
pub use validator::{FieldError, ValidationResult, Validator};
