//! Declarations, the compiled class schema and the per-class cache.
pub mod declaration;
pub mod registry;
pub mod schema;
pub mod types;

pub use declaration::{property, Declaration, PropertyBuilder};
pub use registry::{Component, ElementError, ElementRegistry};
pub use schema::{Access, ClassSchema, Initializer, PropertyDescriptor, PropertySchema};
pub use types::{CallbackError, Declared, Function, PropId, TypeTag, Value};
