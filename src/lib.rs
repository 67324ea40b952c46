// Crate root: declarative element properties.
//
// A component declares its properties once. `validation` checks the
// declarations, `analysis` orders computed properties and flags collisions with
// the inherited element surface, `store` caches the compiled class, and
// `compute` drives each instance.

pub mod analysis;
pub mod compute;
pub mod display;
pub mod store;
pub mod validation;

pub use analysis::interface::{InheritedInterface, InterfaceError};
pub use analysis::shadow::ShadowWarning;
pub use compute::{AttributeRecord, ElementHost, ElementInstance, PropertyError};
pub use display::format_trace;
pub use store::{
    property, CallbackError, ClassSchema, Component, Declaration, Declared, ElementError, ElementRegistry,
    Function, PropertySchema, TypeTag, Value,
};
pub use validation::SchemaError;
