//! Author-facing declaration maps and a typed builder for well-formed entries.

use super::types::{CallbackError, Declared, Function, TypeTag, Value};
use indexmap::IndexMap;

/// An ordered map of declared names to raw declaration values.
///
/// Used for both `properties` and `listeners`. Iteration follows insertion
/// order, which is the order diagnostics are reported in.
#[derive(Debug, Clone, Default)]
pub struct Declaration {
    entries: IndexMap<String, Declared>,
}

impl Declaration {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Declared>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Declared>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Declared> { self.entries.get(name) }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Declared)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl<K: Into<String>, V: Into<Declared>> FromIterator<(K, V)> for Declaration {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self { entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

/// Starts a property declaration.
pub fn property() -> PropertyBuilder {
    PropertyBuilder::default()
}

/// Builds a property declaration object key by key.
///
/// The builder only produces shapes the validator can accept key-wise;
/// cross-field rules (for example `internal` with `reflect`) are still checked
/// when the class is defined.
#[derive(Debug, Clone, Default)]
pub struct PropertyBuilder {
    entries: IndexMap<String, Declared>,
}

impl PropertyBuilder {
    fn set(mut self, key: &str, value: Declared) -> Self {
        self.entries.insert(key.to_string(), value);
        self
    }

    pub fn ty(self, tag: TypeTag) -> Self { self.set("type", Declared::Constructor(tag)) }

    pub fn attribute(self, name: &str) -> Self { self.set("attribute", name.into()) }

    pub fn reflect(self, reflect: bool) -> Self { self.set("reflect", reflect.into()) }

    pub fn internal(self, internal: bool) -> Self { self.set("internal", internal.into()) }

    pub fn read_only(self, read_only: bool) -> Self { self.set("readOnly", read_only.into()) }

    pub fn initial(self, value: impl Into<Declared>) -> Self { self.set("initial", value.into()) }

    /// A factory evaluated once per instance.
    pub fn initial_with(self, factory: impl Fn() -> Value + 'static) -> Self {
        self.set("initial", Declared::function(move |_| Ok(factory())))
    }

    pub fn default_value(self, value: impl Into<Declared>) -> Self {
        self.set("default", value.into())
    }

    pub fn default_with(self, factory: impl Fn() -> Value + 'static) -> Self {
        self.set("default", Declared::function(move |_| Ok(factory())))
    }

    pub fn input(self, names: &[&str]) -> Self {
        let items = names.iter().map(|name| Declared::from(*name)).collect();
        self.set("input", Declared::Array(items))
    }

    pub fn compute(
        self,
        callback: impl Fn(&[Value]) -> Result<Value, CallbackError> + 'static,
    ) -> Self {
        self.set("compute", Declared::Function(Function::new(callback)))
    }

    /// Receives `(new, old)` after the value settles.
    pub fn observe(self, callback: impl Fn(&Value, &Value) -> Result<(), CallbackError> + 'static) -> Self {
        let observer = Function::new(move |args| {
            let undefined = Value::Undefined;
            let new = args.first().unwrap_or(&undefined);
            let old = args.get(1).unwrap_or(&undefined);
            callback(new, old).map(|()| Value::Undefined)
        });
        self.set("observe", Declared::Function(observer))
    }

    pub fn build(self) -> Declared {
        Declared::Object(self.entries)
    }
}

impl From<PropertyBuilder> for Declared {
    fn from(builder: PropertyBuilder) -> Self { builder.build() }
}
