use super::declaration::Declaration;
use super::schema::ClassSchema;
use crate::analysis::interface::InheritedInterface;
use crate::compute::{ElementHost, ElementInstance, PropertyError};
use crate::validation::SchemaError;
use std::any::TypeId;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// A component class: a name plus static property and listener declarations.
pub trait Component: 'static {
    /// Class name used as the root of every diagnostic path.
    const NAME: &'static str;

    fn properties() -> Declaration;

    fn listeners() -> Declaration { Declaration::new() }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElementError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Property(#[from] PropertyError),
}

/// Compiles each component class once and shares the result across instances.
#[derive(Debug)]
pub struct ElementRegistry {
    interface: InheritedInterface,
    classes: HashMap<TypeId, Rc<ClassSchema>>,
}

impl Default for ElementRegistry {
    fn default() -> Self { Self::new() }
}

impl ElementRegistry {
    pub fn new() -> Self { Self::with_interface(InheritedInterface::standard()) }

    pub fn with_interface(interface: InheritedInterface) -> Self {
        Self { interface, classes: HashMap::new() }
    }

    pub fn interface(&self) -> &InheritedInterface { &self.interface }

    /// Validates and compiles `C` on first use; later calls return the cached schema.
    ///
    /// Shadowing warnings go to the `x_element::shadow` target, once per class.
    /// A class that fails to compile is not cached and fails again on the next call.
    pub fn define<C: Component>(&mut self) -> Result<Rc<ClassSchema>, SchemaError> {
        if let Some(schema) = self.classes.get(&TypeId::of::<C>()) {
            return Ok(Rc::clone(schema));
        }

        let schema = ClassSchema::compile(C::NAME, &C::properties(), &C::listeners(), &self.interface)?;
        for warning in schema.warnings() {
            tracing::warn!(target: "x_element::shadow", class = C::NAME, "{}", warning);
        }
        tracing::debug!(
            class = C::NAME,
            properties = schema.properties().len(),
            listeners = schema.listeners().len(),
            "defined element class"
        );

        let schema = Rc::new(schema);
        self.classes.insert(TypeId::of::<C>(), Rc::clone(&schema));
        Ok(schema)
    }

    pub fn schema<C: Component>(&self) -> Option<Rc<ClassSchema>> {
        self.classes.get(&TypeId::of::<C>()).cloned()
    }

    pub fn is_defined<C: Component>(&self) -> bool { self.classes.contains_key(&TypeId::of::<C>()) }

    /// Defines `C` if needed and initializes a new instance on `host`.
    pub fn create<C: Component, H: ElementHost>(&mut self, host: H) -> Result<ElementInstance<H>, ElementError> {
        let schema = self.define::<C>()?;
        Ok(ElementInstance::new(schema, host)?)
    }
}
