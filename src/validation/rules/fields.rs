//! Single-field rules: one validator per recognized declaration key.

use crate::store::types::Declared;
use crate::validation::error::SchemaError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Checks one key of a declaration object. Receives the property path
/// (`Class.properties.name`), the key and the value stored under it.
type FieldCheck = fn(&str, &'static str, &Declared) -> Result<(), SchemaError>;

pub(crate) struct FieldRule {
    pub key: &'static str,
    check: FieldCheck,
}

impl FieldRule {
    pub fn check(&self, path: &str, value: &Declared) -> Result<(), SchemaError> {
        (self.check)(path, self.key, value)
    }
}

/// The recognized keys, in the order their values are checked.
pub(crate) const FIELD_RULES: &[FieldRule] = &[
    FieldRule { key: "type", check: check_type },
    FieldRule { key: "compute", check: check_function },
    FieldRule { key: "observe", check: check_function },
    FieldRule { key: "reflect", check: check_boolean },
    FieldRule { key: "internal", check: check_boolean },
    FieldRule { key: "readOnly", check: check_boolean },
    FieldRule { key: "attribute", check: check_attribute },
    FieldRule { key: "initial", check: check_value },
    FieldRule { key: "default", check: check_value },
    FieldRule { key: "input", check: check_input },
];

pub(crate) fn is_recognized(key: &str) -> bool {
    FIELD_RULES.iter().any(|rule| rule.key == key)
}

static ATTRIBUTE_CASING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("attribute casing pattern is valid"));

fn unexpected(path: String, expected: &'static str, value: &Declared) -> SchemaError {
    SchemaError::UnexpectedValue { path, expected, actual: value.type_name() }
}

fn check_type(path: &str, key: &'static str, value: &Declared) -> Result<(), SchemaError> {
    match value {
        Declared::Constructor(_) => Ok(()),
        _ => Err(unexpected(format!("{}.{}", path, key), "constructor Function", value)),
    }
}

fn check_function(path: &str, key: &'static str, value: &Declared) -> Result<(), SchemaError> {
    match value {
        Declared::Function(_) => Ok(()),
        _ => Err(unexpected(format!("{}.{}", path, key), "Function", value)),
    }
}

fn check_boolean(path: &str, key: &'static str, value: &Declared) -> Result<(), SchemaError> {
    match value {
        Declared::Boolean(_) => Ok(()),
        _ => Err(unexpected(format!("{}.{}", path, key), "Boolean", value)),
    }
}

fn check_attribute(path: &str, key: &'static str, value: &Declared) -> Result<(), SchemaError> {
    let Declared::String(attribute) = value else {
        return Err(unexpected(format!("{}.{}", path, key), "String", value));
    };
    if attribute.is_empty() {
        return Err(SchemaError::EmptyAttribute { path: format!("{}.{}", path, key) });
    }
    if !is_standard_attribute(attribute) {
        return Err(SchemaError::AttributeCasing { path: path.to_string(), attribute: attribute.clone() });
    }
    Ok(())
}

/// `initial` and `default`: a scalar, or a factory function.
fn check_value(path: &str, key: &'static str, value: &Declared) -> Result<(), SchemaError> {
    match value {
        Declared::Boolean(_) | Declared::String(_) | Declared::Number(_) | Declared::Function(_) => Ok(()),
        _ => Err(unexpected(
            format!("{}.{}", path, key),
            "Boolean, String, Number, or Function",
            value,
        )),
    }
}

fn check_input(path: &str, key: &'static str, value: &Declared) -> Result<(), SchemaError> {
    let Declared::Array(items) = value else {
        return Err(unexpected(format!("{}.{}", path, key), "Array", value));
    };
    for (index, item) in items.iter().enumerate() {
        if !matches!(item, Declared::String(_)) {
            return Err(unexpected(format!("{}.{}[{}]", path, key, index), "String", item));
        }
    }
    Ok(())
}

/// Attribute names must match exactly at runtime, so anything outside
/// lower-kebab-case is rejected rather than normalized.
pub(crate) fn is_standard_attribute(attribute: &str) -> bool {
    ATTRIBUTE_CASING.is_match(attribute)
}
