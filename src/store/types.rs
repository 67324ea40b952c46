//! Core value types shared by the validator, the graph builder and the engine.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// A unique, stable identifier for a declared property.
///
/// Ids are assigned in declaration order, so comparing two ids compares their
/// declaration position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct PropId(pub u32);

impl PropId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// The constructor a property declares through its `type` key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Boolean,
    String,
    Number,
    Object,
    Array,
    /// An author-defined constructor, matched by class name.
    Custom(String),
}

impl TypeTag {
    pub fn name(&self) -> &str {
        match self {
            TypeTag::Boolean => "Boolean",
            TypeTag::String => "String",
            TypeTag::Number => "Number",
            TypeTag::Object => "Object",
            TypeTag::Array => "Array",
            TypeTag::Custom(name) => name,
        }
    }

    /// Only these types have an attribute representation.
    pub fn is_serializable(&self) -> bool {
        matches!(self, TypeTag::Boolean | TypeTag::String | TypeTag::Number)
    }

    /// `Null` and `Undefined` are accepted by every type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Undefined | Value::Null) => true,
            (TypeTag::Boolean, Value::Boolean(_)) => true,
            (TypeTag::String, Value::String(_)) => true,
            (TypeTag::Number, Value::Number(_)) => true,
            (TypeTag::Array, Value::Array(_)) => true,
            // Everything that is not a primitive is an Object.
            (TypeTag::Object, Value::Object(_) | Value::Array(_) | Value::Custom { .. }) => true,
            (TypeTag::Custom(name), Value::Custom { class, .. }) => name.as_str() == &**class,
            _ => false,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A runtime property value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Rc<Vec<Value>>),
    Object(Rc<IndexMap<String, Value>>),
    /// An instance of an author-defined constructor.
    Custom { class: Rc<str>, data: Rc<dyn Any> },
}

impl Value {
    pub fn type_name(&self) -> &str {
        match self {
            Value::Undefined => "Undefined",
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
            Value::Custom { class, .. } => class,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Falsy in the author-facing sense: `Undefined`, `Null`, `false`, `0`, `NaN` and `""`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }
}

/// Identity semantics: NaN equals NaN, `0` and `-0` differ, containers compare by pointer.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => {
                (a.is_nan() && b.is_nan()) || a.to_bits() == b.to_bits()
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Custom { data: a, .. }, Value::Custom { data: b, .. }) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&crate::compute::coerce::number_to_string(*n)),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(items) => write!(f, "[Array({})]", items.len()),
            Value::Object(_) => f.write_str("[Object]"),
            Value::Custom { class, .. } => write!(f, "[{}]", class),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self { Value::Boolean(value) }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self { Value::Number(value) }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self { Value::Number(value.into()) }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self { Value::String(value.to_string()) }
}

impl From<String> for Value {
    fn from(value: String) -> Self { Value::String(value) }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self { Value::Array(Rc::new(value)) }
}

/// Failure raised by an author callback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CallbackError {
    message: String,
}

impl CallbackError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<String> for CallbackError {
    fn from(message: String) -> Self { Self { message } }
}

impl From<&str> for CallbackError {
    fn from(message: &str) -> Self { Self::new(message) }
}

type Callback = dyn Fn(&[Value]) -> Result<Value, CallbackError>;

/// An author-supplied callable.
///
/// Every callback shape in a declaration shares this signature: `compute`
/// receives its inputs in declared order, `observe` receives `[new, old]` and
/// value factories receive no arguments.
#[derive(Clone)]
pub struct Function(Rc<Callback>);

impl Function {
    pub fn new(callback: impl Fn(&[Value]) -> Result<Value, CallbackError> + 'static) -> Self {
        Self(Rc::new(callback))
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, CallbackError> {
        (self.0)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Function")
    }
}

/// A raw, author-supplied declaration value, before validation.
#[derive(Debug, Clone, Default)]
pub enum Declared {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<Declared>),
    Object(IndexMap<String, Declared>),
    Function(Function),
    Constructor(TypeTag),
}

impl Declared {
    /// The name used in "got ..." diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Declared::Undefined => "Undefined",
            Declared::Null => "Null",
            Declared::Boolean(_) => "Boolean",
            Declared::Number(_) => "Number",
            Declared::String(_) => "String",
            Declared::Array(_) => "Array",
            Declared::Object(_) => "Object",
            Declared::Function(_) | Declared::Constructor(_) => "Function",
        }
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Declared)>) -> Self {
        Declared::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn function(callback: impl Fn(&[Value]) -> Result<Value, CallbackError> + 'static) -> Self {
        Declared::Function(Function::new(callback))
    }

    /// Scalars convert to runtime values; everything else has no runtime form.
    pub fn as_scalar(&self) -> Option<Value> {
        match self {
            Declared::Boolean(b) => Some(Value::Boolean(*b)),
            Declared::Number(n) => Some(Value::Number(*n)),
            Declared::String(s) => Some(Value::String(s.clone())),
            _ => None,
        }
    }
}

impl From<bool> for Declared {
    fn from(value: bool) -> Self { Declared::Boolean(value) }
}

impl From<f64> for Declared {
    fn from(value: f64) -> Self { Declared::Number(value) }
}

impl From<i32> for Declared {
    fn from(value: i32) -> Self { Declared::Number(value.into()) }
}

impl From<&str> for Declared {
    fn from(value: &str) -> Self { Declared::String(value.to_string()) }
}

impl From<String> for Declared {
    fn from(value: String) -> Self { Declared::String(value) }
}

impl From<TypeTag> for Declared {
    fn from(value: TypeTag) -> Self { Declared::Constructor(value) }
}

impl From<Function> for Declared {
    fn from(value: Function) -> Self { Declared::Function(value) }
}

impl From<Vec<Declared>> for Declared {
    fn from(value: Vec<Declared>) -> Self { Declared::Array(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Number(f64::NAN), Value::Number(f64::NAN), true)]
    #[case(Value::Number(0.0), Value::Number(-0.0), false)]
    #[case(Value::from("a"), Value::from("a"), true)]
    #[case(Value::Undefined, Value::Null, false)]
    #[case(Value::from(vec![]), Value::from(vec![]), false)]
    fn test_identity_equality(#[case] a: Value, #[case] b: Value, #[case] expected: bool) {
        assert_eq!(a == b, expected);
    }

    #[test]
    fn test_shared_containers_are_equal() {
        let list = Value::from(vec![Value::from(1)]);
        assert_eq!(list.clone(), list);
    }

    #[test]
    fn test_type_tag_accepts() {
        let point = Value::Custom { class: Rc::from("Point"), data: Rc::new((1, 2)) };
        assert!(TypeTag::Custom("Point".into()).accepts(&point));
        assert!(TypeTag::Object.accepts(&point));
        assert!(!TypeTag::String.accepts(&Value::from(1)));
        assert!(TypeTag::Number.accepts(&Value::Null));
    }

    #[test]
    fn test_constructors_report_function() {
        assert_eq!(Declared::from(TypeTag::String).type_name(), "Function");
        assert_eq!(Declared::function(|_| Ok(Value::Undefined)).type_name(), "Function");
        assert_eq!(Declared::object([("type", Declared::Undefined)]).type_name(), "Object");
    }
}
