//! Per-instance reactive state: initialization, cascades and attribute sync.
pub mod coerce;
pub mod engine;
pub mod ledger;

pub use engine::{AttributeRecord, ElementHost, ElementInstance, InternalAccess};
pub use ledger::{Ledger, PropertyError};
