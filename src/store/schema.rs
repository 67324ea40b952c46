//! The class-level, immutable result of analyzing a component's declarations.

use super::declaration::Declaration;
use super::types::{CallbackError, Function, PropId, TypeTag, Value};
use crate::analysis::interface::InheritedInterface;
use crate::analysis::shadow::{self, ShadowWarning};
use crate::analysis::topology::DependencyGraph;
use crate::validation::error::SchemaError;
use crate::validation::rules::listeners::validate_listeners;
use crate::validation::SchemaValidator;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Produces the starting value of a property.
#[derive(Debug, Clone)]
pub enum Initializer {
    Value(Value),
    /// Evaluated once per instance.
    Factory(Function),
}

impl Initializer {
    pub fn produce(&self) -> Result<Value, CallbackError> {
        match self {
            Initializer::Value(value) => Ok(value.clone()),
            Initializer::Factory(factory) => factory.call(&[]),
        }
    }
}

/// How a property may be reached from outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadWrite,
    /// Public getter only; writable through the internal pathway.
    ReadOnly,
    /// Public getter only; never writable.
    Computed,
    /// Reachable through the internal pathway only.
    Internal,
}

/// A normalized property declaration, with every default filled in.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub id: PropId,
    pub name: String,
    /// `Class.properties.name`, the prefix of every diagnostic about this property.
    pub path: String,
    pub type_tag: Option<TypeTag>,
    /// Resolved attribute name. Always `None` for internal properties.
    pub attribute: Option<String>,
    pub reflect: bool,
    pub internal: bool,
    pub read_only: bool,
    pub initial: Option<Initializer>,
    pub default: Option<Initializer>,
    pub compute: Option<Function>,
    pub input: Vec<String>,
    pub observe: Option<Function>,
}

impl PropertyDescriptor {
    pub fn is_computed(&self) -> bool { self.compute.is_some() }

    pub fn access(&self) -> Access {
        if self.internal {
            Access::Internal
        } else if self.is_computed() {
            Access::Computed
        } else if self.read_only {
            Access::ReadOnly
        } else {
            Access::ReadWrite
        }
    }
}

/// Descriptors, lookup tables and the dependency graph of one component class.
///
/// Built once and never mutated, so instances share it freely.
#[derive(Debug, Clone)]
pub struct PropertySchema {
    class_name: String,
    descriptors: Vec<PropertyDescriptor>,
    by_name: HashMap<String, PropId>,
    by_attribute: HashMap<String, PropId>,
    graph: DependencyGraph,
}

impl PropertySchema {
    /// Validates `properties` and builds the schema, or reports the first violation.
    pub fn build(class_name: &str, properties: &Declaration) -> Result<Self, SchemaError> {
        SchemaValidator::new(class_name).validate(properties)
    }

    pub(crate) fn from_parts(
        class_name: String,
        descriptors: Vec<PropertyDescriptor>,
        by_attribute: HashMap<String, PropId>,
        graph: DependencyGraph,
    ) -> Self {
        let by_name = descriptors.iter().map(|d| (d.name.clone(), d.id)).collect();
        Self { class_name, descriptors, by_name, by_attribute, graph }
    }

    pub fn class_name(&self) -> &str { &self.class_name }

    pub fn len(&self) -> usize { self.descriptors.len() }

    pub fn is_empty(&self) -> bool { self.descriptors.is_empty() }

    pub fn descriptors(&self) -> &[PropertyDescriptor] { &self.descriptors }

    #[inline(always)]
    pub fn descriptor(&self, id: PropId) -> &PropertyDescriptor { &self.descriptors[id.index()] }

    pub fn id_of(&self, name: &str) -> Option<PropId> { self.by_name.get(name).copied() }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.id_of(name).map(|id| self.descriptor(id))
    }

    /// The property an attribute name maps to, if any.
    pub fn attribute_owner(&self, attribute: &str) -> Option<PropId> {
        self.by_attribute.get(attribute).copied()
    }

    /// Attribute names the host should report changes for, in declaration order.
    pub fn observed_attributes(&self) -> Vec<&str> {
        self.descriptors.iter().filter_map(|d| d.attribute.as_deref()).collect()
    }

    pub fn graph(&self) -> &DependencyGraph { &self.graph }

    /// Every property, each after all of its inputs.
    pub fn order(&self) -> &[PropId] { self.graph.order() }
}

/// Everything a component class contributes: its property schema, its
/// listeners and the shadowing diagnostics raised when it was defined.
#[derive(Debug, Clone)]
pub struct ClassSchema {
    properties: PropertySchema,
    listeners: IndexMap<String, Function>,
    warnings: Vec<ShadowWarning>,
}

impl ClassSchema {
    pub fn compile(
        class_name: &str,
        properties: &Declaration,
        listeners: &Declaration,
        interface: &InheritedInterface,
    ) -> Result<Self, SchemaError> {
        let properties = PropertySchema::build(class_name, properties)?;
        let warnings = shadow::analyze(&properties, interface)?;
        let listeners = validate_listeners(class_name, listeners)?;
        Ok(Self { properties, listeners, warnings })
    }

    pub fn properties(&self) -> &PropertySchema { &self.properties }

    pub fn listeners(&self) -> &IndexMap<String, Function> { &self.listeners }

    pub fn warnings(&self) -> &[ShadowWarning] { &self.warnings }

    pub fn class_name(&self) -> &str { self.properties.class_name() }
}
