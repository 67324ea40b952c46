//! The static analysis front door for property declarations.
//!
//! This module provides the `SchemaValidator`, which checks a component's
//! declarations against the full rulebook *before* any instance exists. Every
//! failure carries the fully-qualified path of the offending declaration.

pub use self::error::SchemaError;
pub use self::rules::attributes::default_attribute;
pub use self::rules::listeners::validate_listeners;
pub use self::validator::SchemaValidator;

// --- MODULE DECLARATIONS ---
pub(crate) mod error;
mod validator;
pub(crate) mod rules {
    pub mod attributes;
    pub mod combinations;
    pub mod fields;
    pub mod listeners;
}
