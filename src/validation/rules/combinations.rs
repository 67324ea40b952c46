//! Cross-field rules, run once every single-field rule has passed.

use crate::store::types::{Declared, TypeTag};
use crate::validation::error::SchemaError;
use indexmap::IndexMap;

type Fields = IndexMap<String, Declared>;

fn has(fields: &Fields, key: &str) -> bool {
    fields.contains_key(key)
}

fn is_true(fields: &Fields, key: &str) -> bool {
    matches!(fields.get(key), Some(Declared::Boolean(true)))
}

pub(crate) fn validate_combinations(path: &str, fields: &Fields) -> Result<(), SchemaError> {
    let path = path.to_string();
    let computed = has(fields, "compute");

    if has(fields, "input") && !computed {
        return Err(SchemaError::InputWithoutCompute { path });
    }
    if computed && !has(fields, "input") {
        return Err(SchemaError::ComputeWithoutInput { path });
    }
    if computed && has(fields, "initial") {
        return Err(SchemaError::ComputedInitial { path });
    }
    if computed && has(fields, "default") {
        return Err(SchemaError::ComputedDefault { path });
    }
    if computed && is_true(fields, "readOnly") {
        return Err(SchemaError::ComputedReadOnly { path });
    }

    let internal = is_true(fields, "internal");
    if internal && is_true(fields, "readOnly") {
        return Err(SchemaError::InternalReadOnly { path });
    }
    if internal && is_true(fields, "reflect") {
        return Err(SchemaError::InternalReflect { path });
    }
    if internal && has(fields, "attribute") {
        return Err(SchemaError::InternalAttribute { path });
    }

    if is_true(fields, "reflect") {
        let type_tag = match fields.get("type") {
            Some(Declared::Constructor(tag)) => Some(tag),
            _ => None,
        };
        if !type_tag.is_some_and(TypeTag::is_serializable) {
            let type_name = type_tag.map_or_else(|| "Undefined".to_string(), |tag| tag.name().to_string());
            return Err(SchemaError::UnserializableReflect { path, type_name });
        }
    }
    Ok(())
}
