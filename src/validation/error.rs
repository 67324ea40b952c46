//! Defines the error types for the validation module.
//!
//! The `Display` output of every variant is part of the public contract:
//! authors (and their test suites) match on the exact text.

use thiserror::Error;

/// A fatal problem with a component's declarations. Aborts class definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("{path} has an unexpected value (expected Object, got {actual}).")]
    NotAnObject { path: String, actual: &'static str },

    #[error("Unexpected key \"{path}\" contains \"-\" (property names should be camelCased).")]
    HyphenatedName { path: String },

    #[error("Unexpected key \"{path}\".")]
    UnexpectedKey { path: String },

    #[error("Unexpected value for \"{path}\" (expected {expected}, got {actual}).")]
    UnexpectedValue { path: String, expected: &'static str, actual: &'static str },

    #[error("Unexpected value for \"{path}\" (expected non-empty String).")]
    EmptyAttribute { path: String },

    #[error("{path} has non-standard attribute casing \"{attribute}\" (use lower-cased names).")]
    AttributeCasing { path: String, attribute: String },

    #[error("{path} causes a duplicated attribute \"{attribute}\".")]
    DuplicateAttribute { path: String, attribute: String },

    #[error("{path} has an unexpected item (\"{item}\" has not been declared).")]
    UndeclaredInput { path: String, item: String },

    #[error("{path}.input is cyclic.")]
    CyclicInput { path: String },

    #[error("Found \"{path}.input\" without \"{path}.compute\" (computed properties require a compute callback).")]
    InputWithoutCompute { path: String },

    #[error("Found \"{path}.compute\" without \"{path}.input\" (computed properties require an input list).")]
    ComputeWithoutInput { path: String },

    #[error("Found \"{path}.initial\" and \"{path}.compute\" (computed properties cannot set an initial value).")]
    ComputedInitial { path: String },

    #[error("Found \"{path}.default\" and \"{path}.compute\" (computed properties cannot set a default value).")]
    ComputedDefault { path: String },

    #[error("Found \"{path}.readOnly\" and \"{path}.compute\" (computed properties cannot define read-only).")]
    ComputedReadOnly { path: String },

    #[error("Both \"{path}.internal\" and \"{path}.readOnly\" are true (read-only properties cannot be internal).")]
    InternalReadOnly { path: String },

    #[error("Both \"{path}.reflect\" and \"{path}.internal\" are true (reflected properties cannot be internal).")]
    InternalReflect { path: String },

    #[error("Found \"{path}.attribute\" but \"{path}.internal\" is true (internal properties cannot have attributes).")]
    InternalAttribute { path: String },

    #[error("Found unserializable \"{path}.type\" ({type_name}) but \"{path}.reflect\" is true.")]
    UnserializableReflect { path: String, type_name: String },

    #[error("Unexpected key \"{path}\" shadows in {base}.prototype interface.")]
    ShadowsReserved { path: String, base: String },

    #[error("{path} has unexpected value (expected Function, got {actual}).")]
    ListenerNotFunction { path: String, actual: &'static str },
}

impl SchemaError {
    /// The fully-qualified declaration path the error points at.
    pub fn path(&self) -> &str {
        match self {
            SchemaError::NotAnObject { path, .. }
            | SchemaError::HyphenatedName { path }
            | SchemaError::UnexpectedKey { path }
            | SchemaError::UnexpectedValue { path, .. }
            | SchemaError::EmptyAttribute { path }
            | SchemaError::AttributeCasing { path, .. }
            | SchemaError::DuplicateAttribute { path, .. }
            | SchemaError::UndeclaredInput { path, .. }
            | SchemaError::CyclicInput { path }
            | SchemaError::InputWithoutCompute { path }
            | SchemaError::ComputeWithoutInput { path }
            | SchemaError::ComputedInitial { path }
            | SchemaError::ComputedDefault { path }
            | SchemaError::ComputedReadOnly { path }
            | SchemaError::InternalReadOnly { path }
            | SchemaError::InternalReflect { path }
            | SchemaError::InternalAttribute { path }
            | SchemaError::UnserializableReflect { path, .. }
            | SchemaError::ShadowsReserved { path, .. }
            | SchemaError::ListenerNotFunction { path, .. } => path,
        }
    }
}
