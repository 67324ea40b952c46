//! Listener declarations: every entry must map an event name to a callback.

use crate::store::declaration::Declaration;
use crate::store::types::{Declared, Function};
use crate::validation::error::SchemaError;
use indexmap::IndexMap;

pub fn validate_listeners(
    class_name: &str,
    listeners: &Declaration,
) -> Result<IndexMap<String, Function>, SchemaError> {
    let mut validated = IndexMap::with_capacity(listeners.len());
    for (event, value) in listeners.iter() {
        match value {
            Declared::Function(handler) => {
                validated.insert(event.to_string(), handler.clone());
            }
            _ => {
                return Err(SchemaError::ListenerNotFunction {
                    path: format!("{}.listeners.{}", class_name, event),
                    actual: value.type_name(),
                })
            }
        }
    }
    Ok(validated)
}
