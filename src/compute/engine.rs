//! A synchronous, single-threaded reactive engine for one element instance.
use crate::compute::coerce;
use crate::compute::ledger::{Ledger, PropertyError};
use crate::store::schema::{Access, ClassSchema, PropertyDescriptor, PropertySchema};
use crate::store::types::{PropId, Value};
use smallvec::SmallVec;
use std::rc::Rc;

/// A raw attribute-change notification, as queued by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRecord {
    pub name: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

/// The element the engine drives: attribute I/O plus render scheduling.
pub trait ElementHost {
    fn get_attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&mut self, name: &str, value: &str);
    fn remove_attribute(&mut self, name: &str);

    /// Notifications the platform queued since the last call. Hosts that
    /// deliver them synchronously through `attribute_changed` keep the default.
    fn take_attribute_records(&mut self) -> Vec<AttributeRecord> { Vec::new() }

    /// Called once at the end of initialization and of every cascade that
    /// changed something.
    fn request_render(&mut self) {}
}

/// Live property state of one element, driven by a shared class schema.
pub struct ElementInstance<H: ElementHost> {
    schema: Rc<ClassSchema>,
    host: H,
    ledger: Ledger,
}

impl<H: ElementHost> ElementInstance<H> {
    /// Initializes every property, reflects, notifies observers and requests a render.
    pub fn new(schema: Rc<ClassSchema>, host: H) -> Result<Self, PropertyError> {
        let ledger = Ledger::new(schema.properties().len());
        let mut instance = Self { schema, host, ledger };
        instance.initialize()?;
        Ok(instance)
    }

    pub fn schema(&self) -> &Rc<ClassSchema> { &self.schema }

    pub fn host(&self) -> &H { &self.host }

    pub fn host_mut(&mut self) -> &mut H { &mut self.host }

    pub fn ledger(&self) -> &Ledger { &self.ledger }

    /// Every property with its current value, in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (&str, Value)> + '_ {
        self.properties()
            .descriptors()
            .iter()
            .map(|d| (d.name.as_str(), self.ledger.value(d.id)))
    }

    /// Public read. Internal properties are not reachable here.
    pub fn get(&self, name: &str) -> Result<Value, PropertyError> {
        let descriptor = self.lookup(name)?;
        if descriptor.internal {
            return Err(PropertyError::Internal { path: descriptor.path.clone() });
        }
        Ok(self.ledger.value(descriptor.id))
    }

    /// Public write.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), PropertyError> {
        let descriptor = self.lookup(name)?;
        let path = || descriptor.path.clone();
        let rejection = match descriptor.access() {
            Access::ReadWrite => None,
            Access::ReadOnly => Some(PropertyError::ReadOnly { path: path() }),
            Access::Computed => Some(PropertyError::Computed { path: path() }),
            Access::Internal => Some(PropertyError::Internal { path: path() }),
        };
        if let Some(error) = rejection {
            return Err(error);
        }
        let id = descriptor.id;
        self.write(id, value.into())
    }

    /// The pathway the component itself uses: reaches internal properties and
    /// may write read-only ones.
    pub fn internal(&mut self) -> InternalAccess<'_, H> {
        InternalAccess { instance: self }
    }

    /// Synchronizes a property with a platform attribute change.
    ///
    /// Ignored while the engine is reflecting, for attributes no property
    /// owns, and for properties that cannot be written from outside.
    pub fn attribute_changed(
        &mut self,
        name: &str,
        old: Option<&str>,
        new: Option<&str>,
    ) -> Result<(), PropertyError> {
        if self.ledger.is_reflecting() || old == new {
            return Ok(());
        }
        let Some(id) = self.properties().attribute_owner(name) else {
            tracing::trace!(attribute = name, "ignoring unobserved attribute");
            return Ok(());
        };
        let descriptor = self.properties().descriptor(id);
        if descriptor.access() != Access::ReadWrite
            || !coerce::is_attribute_driven(descriptor.type_tag.as_ref())
        {
            return Ok(());
        }
        let value = coerce::parse_attribute(descriptor.type_tag.as_ref(), new);
        self.write(id, value)
    }

    fn properties(&self) -> &PropertySchema { self.schema.properties() }

    fn lookup(&self, name: &str) -> Result<&PropertyDescriptor, PropertyError> {
        self.properties().property(name).ok_or_else(|| PropertyError::Unknown {
            path: format!("{}.properties.{}", self.properties().class_name(), name),
        })
    }

    fn initialize(&mut self) -> Result<(), PropertyError> {
        let schema = Rc::clone(&self.schema);
        let properties = schema.properties();
        tracing::debug!(class = properties.class_name(), "initializing element instance");

        for &id in properties.order() {
            let descriptor = properties.descriptor(id);
            let value = if descriptor.is_computed() {
                self.evaluate(descriptor)?
            } else {
                self.starting_value(descriptor)?
            };
            self.ledger.insert(id, value);
        }

        for &id in properties.order() {
            let value = self.ledger.value(id);
            self.reflect(properties.descriptor(id), &value)?;
            if !matches!(value, Value::Undefined) {
                self.notify(properties.descriptor(id), &value, &Value::Undefined)?;
            }
        }

        self.host.request_render();
        Ok(())
    }

    /// Host attribute, else `initial`, else `default`, else `Undefined`.
    /// Markup only seeds properties that accept outside writes.
    fn starting_value(&self, descriptor: &PropertyDescriptor) -> Result<Value, PropertyError> {
        let type_tag = descriptor.type_tag.as_ref();
        if let Some(attribute) = descriptor.attribute.as_deref() {
            if descriptor.access() == Access::ReadWrite && coerce::is_attribute_driven(type_tag) {
                if let Some(text) = self.host.get_attribute(attribute) {
                    return Ok(coerce::parse_attribute(type_tag, Some(&text)));
                }
            }
        }
        let value = match descriptor.initial.as_ref().or(descriptor.default.as_ref()) {
            Some(initializer) => initializer.produce()?,
            None => Value::Undefined,
        };
        check_type(descriptor, &value)?;
        Ok(value)
    }

    fn evaluate(&self, descriptor: &PropertyDescriptor) -> Result<Value, PropertyError> {
        let Some(compute) = descriptor.compute.as_ref() else {
            return Ok(self.ledger.value(descriptor.id));
        };
        let inputs: SmallVec<[Value; 4]> = self
            .properties()
            .graph()
            .inputs(descriptor.id)
            .iter()
            .map(|&input| self.ledger.value(input))
            .collect();
        let value = compute.call(&inputs)?;
        check_type(descriptor, &value)?;
        Ok(value)
    }

    /// Type-checks, applies `default` for nullish values and runs the cascade
    /// if the value actually changed.
    fn write(&mut self, id: PropId, value: Value) -> Result<(), PropertyError> {
        let descriptor = self.properties().descriptor(id);
        check_type(descriptor, &value)?;
        let value = match (&descriptor.default, value.is_nullish()) {
            (Some(default), true) => {
                let value = default.produce()?;
                check_type(descriptor, &value)?;
                value
            }
            _ => value,
        };
        if self.ledger.get(id) == Some(&value) {
            return Ok(());
        }
        let old = self.ledger.insert(id, value);

        let result = self.cascade(id, old);
        self.ledger.finish_cascade();
        result
    }

    /// Recomputes dependents of `root` in topological order. A dirty property
    /// is only recomputed when at least one of its inputs changed in this
    /// cascade. Each property that ends up with a new value is reflected and
    /// observed as soon as it settles.
    fn cascade(&mut self, root: PropId, old: Value) -> Result<(), PropertyError> {
        let schema = Rc::clone(&self.schema);
        let properties = schema.properties();

        self.ledger.mark_changed(root);
        for id in properties.graph().downstream_from(&[root]) {
            if id != root {
                self.ledger.mark_dirty(id);
            }
        }

        let mut root_old = old;
        for &id in properties.order() {
            let descriptor = properties.descriptor(id);
            let old = if id == root {
                std::mem::take(&mut root_old)
            } else {
                if !self.ledger.take_dirty(id) {
                    continue;
                }
                let inputs = properties.graph().inputs(id);
                if !inputs.iter().any(|&input| self.ledger.has_changed(input)) {
                    tracing::trace!(property = %descriptor.name, "inputs unchanged, skipping");
                    continue;
                }
                let value = self.evaluate(descriptor)?;
                if self.ledger.get(id) == Some(&value) {
                    continue;
                }
                self.ledger.mark_changed(id);
                self.ledger.insert(id, value)
            };

            tracing::trace!(property = %descriptor.name, "settled");
            let value = self.ledger.value(id);
            self.reflect(descriptor, &value)?;
            self.notify(descriptor, &value, &old)?;
        }

        self.host.request_render();
        Ok(())
    }

    /// Mirrors a value to its attribute while holding the reflection lock.
    fn reflect(&mut self, descriptor: &PropertyDescriptor, value: &Value) -> Result<(), PropertyError> {
        let (true, Some(attribute)) = (descriptor.reflect, descriptor.attribute.as_deref()) else {
            return Ok(());
        };

        self.ledger.set_reflecting(true);
        match coerce::serialize(value) {
            Some(text) => self.host.set_attribute(attribute, &text),
            None => self.host.remove_attribute(attribute),
        }
        let mut result = Ok(());
        for record in self.host.take_attribute_records() {
            result = result.and(self.attribute_changed(&record.name, record.old.as_deref(), record.new.as_deref()));
        }
        self.ledger.set_reflecting(false);
        result
    }

    fn notify(&self, descriptor: &PropertyDescriptor, value: &Value, old: &Value) -> Result<(), PropertyError> {
        if let Some(observe) = &descriptor.observe {
            observe.call(&[value.clone(), old.clone()])?;
        }
        Ok(())
    }
}

fn check_type(descriptor: &PropertyDescriptor, value: &Value) -> Result<(), PropertyError> {
    match &descriptor.type_tag {
        Some(tag) if !tag.accepts(value) => Err(PropertyError::WrongType {
            path: descriptor.path.clone(),
            expected: tag.name().to_string(),
            actual: value.type_name().to_string(),
        }),
        _ => Ok(()),
    }
}

/// The internal pathway of one instance.
pub struct InternalAccess<'a, H: ElementHost> {
    instance: &'a mut ElementInstance<H>,
}

impl<H: ElementHost> InternalAccess<'_, H> {
    /// Reads any property, internal ones included.
    pub fn get(&self, name: &str) -> Result<Value, PropertyError> {
        let descriptor = self.instance.lookup(name)?;
        Ok(self.instance.ledger.value(descriptor.id))
    }

    /// Writes any property that is not computed.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), PropertyError> {
        let descriptor = self.instance.lookup(name)?;
        if descriptor.is_computed() {
            return Err(PropertyError::Computed { path: descriptor.path.clone() });
        }
        let id = descriptor.id;
        self.instance.write(id, value.into())
    }
}
