//! Per-instance property state.

use crate::store::types::{PropId, Value};

pub use self::error::PropertyError;
mod error {
    use crate::store::types::CallbackError;
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum PropertyError {
        #[error("Property \"{path}\" does not exist.")]
        Unknown { path: String },
        #[error("Property \"{path}\" is internal (internal properties are only reachable through the internal pathway).")]
        Internal { path: String },
        #[error("Property \"{path}\" is read-only (read-only properties are only writable through the internal pathway).")]
        ReadOnly { path: String },
        #[error("Property \"{path}\" is computed (computed properties are read-only).")]
        Computed { path: String },
        #[error("Unexpected value for \"{path}\" (expected {expected}, got {actual}).")]
        WrongType { path: String, expected: String, actual: String },
        /// An author callback failed; its message is passed through untouched.
        #[error(transparent)]
        Callback(#[from] CallbackError),
    }
}

/// Dense slots indexed by `PropId`. `None` marks a property that has not been
/// initialized yet.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    values: Vec<Option<Value>>,
    // Computed properties awaiting recomputation in the current cascade.
    dirty: Vec<bool>,
    // Properties whose value changed in the current cascade.
    changed: Vec<bool>,
    reflecting: bool,
}

impl Ledger {
    pub fn new(size: usize) -> Self {
        Self {
            values: vec![None; size],
            dirty: vec![false; size],
            changed: vec![false; size],
            reflecting: false,
        }
    }

    #[inline(always)]
    pub fn get(&self, id: PropId) -> Option<&Value> {
        self.values.get(id.index())?.as_ref()
    }

    /// The current value, `Undefined` when uninitialized.
    pub fn value(&self, id: PropId) -> Value {
        self.get(id).cloned().unwrap_or_default()
    }

    pub fn is_initialized(&self, id: PropId) -> bool { self.get(id).is_some() }

    /// Stores `value` and returns the previous one.
    pub fn insert(&mut self, id: PropId, value: Value) -> Value {
        self.values[id.index()].replace(value).unwrap_or_default()
    }

    pub fn mark_dirty(&mut self, id: PropId) { self.dirty[id.index()] = true; }

    pub fn is_dirty(&self, id: PropId) -> bool { self.dirty[id.index()] }

    /// Clears the dirty flag, reporting whether it was set.
    pub fn take_dirty(&mut self, id: PropId) -> bool {
        std::mem::replace(&mut self.dirty[id.index()], false)
    }

    pub fn mark_changed(&mut self, id: PropId) { self.changed[id.index()] = true; }

    pub fn has_changed(&self, id: PropId) -> bool { self.changed[id.index()] }

    /// Resets the per-cascade masks, including flags left by a cascade that failed.
    pub fn finish_cascade(&mut self) {
        self.dirty.fill(false);
        self.changed.fill(false);
    }

    pub fn is_reflecting(&self) -> bool { self.reflecting }

    pub fn set_reflecting(&mut self, reflecting: bool) { self.reflecting = reflecting; }
}
