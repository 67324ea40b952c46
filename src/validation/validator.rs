//! The central validator that orchestrates the execution of all validation rules.
use super::error::SchemaError;
use super::rules::attributes::resolve_attributes;
use super::rules::combinations::validate_combinations;
use super::rules::fields::{is_recognized, FIELD_RULES};
use crate::analysis::topology::DependencyGraph;
use crate::store::declaration::Declaration;
use crate::store::schema::{Initializer, PropertyDescriptor, PropertySchema};
use crate::store::types::{Declared, PropId};
use indexmap::IndexMap;

/// Turns a raw property declaration map into a [`PropertySchema`].
///
/// Validation is fail-fast: the first violation, in declaration order, is
/// returned. Phases run over the whole map before the next phase starts, so a
/// shape problem in a late property is reported before a cross-property
/// problem in an early one.
pub struct SchemaValidator<'a> {
    class_name: &'a str,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(class_name: &'a str) -> Self {
        Self { class_name }
    }

    pub fn validate(&self, properties: &Declaration) -> Result<PropertySchema, SchemaError> {
        // 1. Every declaration is an object.
        let mut entries = Vec::with_capacity(properties.len());
        for (name, declared) in properties.iter() {
            let path = format!("{}.properties.{}", self.class_name, name);
            match declared {
                Declared::Object(fields) => entries.push((name, path, fields)),
                other => return Err(SchemaError::NotAnObject { path, actual: other.type_name() }),
            }
        }

        // 2. Each declaration on its own.
        let mut descriptors = Vec::with_capacity(entries.len());
        for (index, (name, path, fields)) in entries.into_iter().enumerate() {
            validate_property(name, &path, fields)?;
            descriptors.push(normalize(PropId::new(index), name, path, fields));
        }

        // 3. Attributes across the whole set.
        let by_attribute = resolve_attributes(&mut descriptors)?;

        // 4. Inputs, cycles and evaluation order.
        let graph = DependencyGraph::build(&descriptors)?;

        tracing::debug!(
            class = self.class_name,
            properties = descriptors.len(),
            "validated property declarations"
        );
        Ok(PropertySchema::from_parts(self.class_name.to_string(), descriptors, by_attribute, graph))
    }
}

fn validate_property(name: &str, path: &str, fields: &IndexMap<String, Declared>) -> Result<(), SchemaError> {
    if name.contains('-') {
        return Err(SchemaError::HyphenatedName { path: path.to_string() });
    }
    if let Some(key) = fields.keys().find(|key| !is_recognized(key)) {
        return Err(SchemaError::UnexpectedKey { path: format!("{}.{}", path, key) });
    }
    for rule in FIELD_RULES {
        if let Some(value) = fields.get(rule.key) {
            rule.check(path, value)?;
        }
    }
    validate_combinations(path, fields)
}

/// Builds a descriptor from fields that already passed validation.
fn normalize(id: PropId, name: &str, path: String, fields: &IndexMap<String, Declared>) -> PropertyDescriptor {
    let flag = |key: &str| matches!(fields.get(key), Some(Declared::Boolean(true)));
    let function = |key: &str| match fields.get(key) {
        Some(Declared::Function(f)) => Some(f.clone()),
        _ => None,
    };
    let initializer = |key: &str| match fields.get(key) {
        Some(Declared::Function(factory)) => Some(Initializer::Factory(factory.clone())),
        Some(scalar) => scalar.as_scalar().map(Initializer::Value),
        None => None,
    };

    PropertyDescriptor {
        id,
        name: name.to_string(),
        path,
        type_tag: match fields.get("type") {
            Some(Declared::Constructor(tag)) => Some(tag.clone()),
            _ => None,
        },
        attribute: match fields.get("attribute") {
            Some(Declared::String(attribute)) => Some(attribute.clone()),
            _ => None,
        },
        reflect: flag("reflect"),
        internal: flag("internal"),
        read_only: flag("readOnly"),
        initial: initializer("initial"),
        default: initializer("default"),
        compute: function("compute"),
        input: match fields.get("input") {
            Some(Declared::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Declared::String(name) => Some(name.clone()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        },
        observe: function("observe"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::declaration::property;
    use crate::store::types::{TypeTag, Value};
    use rstest::rstest;

    fn noop() -> Declared {
        Declared::function(|_| Ok(Value::Undefined))
    }

    fn single(name: &str, fields: Vec<(&str, Declared)>) -> Declaration {
        Declaration::new().with(name, Declared::object(fields))
    }

    fn message(declaration: Declaration) -> String {
        match PropertySchema::build("TestElement", &declaration) {
            Ok(_) => "no error was thrown".to_string(),
            Err(err) => err.to_string(),
        }
    }

    #[rstest]
    #[case::hyphen(
        single("just-stop", vec![]),
        "Unexpected key \"TestElement.properties.just-stop\" contains \"-\" (property names should be camelCased)."
    )]
    #[case::attribute_casing(
        single("ok", vec![("attribute", "this-IS-not-OK".into())]),
        "TestElement.properties.ok has non-standard attribute casing \"this-IS-not-OK\" (use lower-cased names)."
    )]
    #[case::unknown_key(
        single("badProperty", vec![("doesNotExist", true.into())]),
        "Unexpected key \"TestElement.properties.badProperty.doesNotExist\"."
    )]
    #[case::not_an_object(
        Declaration::new().with("badProperty", Declared::Undefined),
        "TestElement.properties.badProperty has an unexpected value (expected Object, got Undefined)."
    )]
    #[case::type_not_constructor(
        single("badType", vec![("type", Declared::Undefined)]),
        "Unexpected value for \"TestElement.properties.badType.type\" (expected constructor Function, got Undefined)."
    )]
    #[case::compute_not_function(
        single("badCompute", vec![("compute", Declared::Undefined)]),
        "Unexpected value for \"TestElement.properties.badCompute.compute\" (expected Function, got Undefined)."
    )]
    #[case::observe_not_function(
        single("badObserve", vec![("observe", Declared::Undefined)]),
        "Unexpected value for \"TestElement.properties.badObserve.observe\" (expected Function, got Undefined)."
    )]
    #[case::attribute_not_string(
        single("badAttribute", vec![("attribute", Declared::Undefined)]),
        "Unexpected value for \"TestElement.properties.badAttribute.attribute\" (expected String, got Undefined)."
    )]
    #[case::attribute_empty(
        single("badAttribute", vec![("attribute", "".into())]),
        "Unexpected value for \"TestElement.properties.badAttribute.attribute\" (expected non-empty String)."
    )]
    #[case::duplicate_attribute(
        Declaration::new()
            .with("attribute", property())
            .with("aliased", property().attribute("attribute")),
        "TestElement.properties.aliased causes a duplicated attribute \"attribute\"."
    )]
    #[case::default_not_scalar(
        single("badValue", vec![("default", Declared::object([("nested", Declared::Null)]))]),
        "Unexpected value for \"TestElement.properties.badValue.default\" (expected Boolean, String, Number, or Function, got Object)."
    )]
    #[case::initial_not_scalar(
        single("badValue", vec![("initial", Declared::Null)]),
        "Unexpected value for \"TestElement.properties.badValue.initial\" (expected Boolean, String, Number, or Function, got Null)."
    )]
    #[case::reflect_not_boolean(
        single("badReflect", vec![("reflect", Declared::Undefined)]),
        "Unexpected value for \"TestElement.properties.badReflect.reflect\" (expected Boolean, got Undefined)."
    )]
    #[case::internal_not_boolean(
        single("badInternal", vec![("internal", Declared::Undefined)]),
        "Unexpected value for \"TestElement.properties.badInternal.internal\" (expected Boolean, got Undefined)."
    )]
    #[case::read_only_not_boolean(
        single("badReadOnly", vec![("readOnly", Declared::Undefined)]),
        "Unexpected value for \"TestElement.properties.badReadOnly.readOnly\" (expected Boolean, got Undefined)."
    )]
    #[case::input_not_array(
        single("badInput", vec![("input", Declared::object([("0", "foo".into())]))]),
        "Unexpected value for \"TestElement.properties.badInput.input\" (expected Array, got Object)."
    )]
    #[case::input_item_not_string(
        single("badInput", vec![("input", Declared::Array(vec!["foo".into(), "bar".into(), Declared::Undefined]))]),
        "Unexpected value for \"TestElement.properties.badInput.input[2]\" (expected String, got Undefined)."
    )]
    #[case::input_undeclared(
        Declaration::new()
            .with("foo", property())
            .with("badInput", property().input(&["foo", "bar"]).compute(|_| Ok(Value::Undefined))),
        "TestElement.properties.badInput.input[1] has an unexpected item (\"bar\" has not been declared)."
    )]
    #[case::input_without_compute(
        single("missingCompute", vec![("input", Declared::Array(vec!["foo".into(), "bar".into(), "baz".into()]))]),
        "Found \"TestElement.properties.missingCompute.input\" without \"TestElement.properties.missingCompute.compute\" (computed properties require a compute callback)."
    )]
    #[case::compute_without_input(
        single("missingInput", vec![("compute", noop())]),
        "Found \"TestElement.properties.missingInput.compute\" without \"TestElement.properties.missingInput.input\" (computed properties require an input list)."
    )]
    #[case::computed_initial(
        single("unexpectedValue", vec![("compute", noop()), ("input", Declared::Array(vec![])), ("initial", 5.into())]),
        "Found \"TestElement.properties.unexpectedValue.initial\" and \"TestElement.properties.unexpectedValue.compute\" (computed properties cannot set an initial value)."
    )]
    #[case::computed_default(
        single("unexpectedValue", vec![("compute", noop()), ("input", Declared::Array(vec![])), ("default", 5.into())]),
        "Found \"TestElement.properties.unexpectedValue.default\" and \"TestElement.properties.unexpectedValue.compute\" (computed properties cannot set a default value)."
    )]
    #[case::computed_read_only(
        single("unexpectedValue", vec![("compute", noop()), ("input", Declared::Array(vec![])), ("readOnly", true.into())]),
        "Found \"TestElement.properties.unexpectedValue.readOnly\" and \"TestElement.properties.unexpectedValue.compute\" (computed properties cannot define read-only)."
    )]
    #[case::internal_read_only(
        Declaration::new().with("internalReadOnlyProperty", property().ty(TypeTag::String).internal(true).read_only(true)),
        "Both \"TestElement.properties.internalReadOnlyProperty.internal\" and \"TestElement.properties.internalReadOnlyProperty.readOnly\" are true (read-only properties cannot be internal)."
    )]
    #[case::internal_reflect(
        Declaration::new().with("internalReflectedProperty", property().ty(TypeTag::String).internal(true).reflect(true)),
        "Both \"TestElement.properties.internalReflectedProperty.reflect\" and \"TestElement.properties.internalReflectedProperty.internal\" are true (reflected properties cannot be internal)."
    )]
    #[case::internal_attribute(
        Declaration::new().with("internalAttributeProperty", property().ty(TypeTag::String).internal(true).attribute("custom-attribute")),
        "Found \"TestElement.properties.internalAttributeProperty.attribute\" but \"TestElement.properties.internalAttributeProperty.internal\" is true (internal properties cannot have attributes)."
    )]
    #[case::reflect_object(
        Declaration::new().with("nonSerializableProperty", property().ty(TypeTag::Object).reflect(true)),
        "Found unserializable \"TestElement.properties.nonSerializableProperty.type\" (Object) but \"TestElement.properties.nonSerializableProperty.reflect\" is true."
    )]
    #[case::reflect_typeless(
        Declaration::new().with("typelessProperty", property().reflect(true)),
        "Found unserializable \"TestElement.properties.typelessProperty.type\" (Undefined) but \"TestElement.properties.typelessProperty.reflect\" is true."
    )]
    #[case::reflect_custom(
        Declaration::new().with("point", property().ty(TypeTag::Custom("Point".into())).reflect(true)),
        "Found unserializable \"TestElement.properties.point.type\" (Point) but \"TestElement.properties.point.reflect\" is true."
    )]
    fn test_validation_messages(#[case] declaration: Declaration, #[case] expected: &str) {
        assert_eq!(message(declaration), expected);
    }

    #[test]
    fn test_shape_errors_win_over_later_cross_property_errors() {
        // `first` has an undeclared input, but the object check covers the
        // whole map before any property is inspected.
        let declaration = Declaration::new()
            .with("first", property().input(&["missing"]).compute(|_| Ok(Value::Undefined)))
            .with("second", Declared::from(1));
        assert_eq!(
            message(declaration),
            "TestElement.properties.second has an unexpected value (expected Object, got Number)."
        );
    }

    #[test]
    fn test_unknown_key_is_checked_before_values() {
        let declaration = single("mixed", vec![("type", Declared::Null), ("bogus", true.into())]);
        assert_eq!(message(declaration), "Unexpected key \"TestElement.properties.mixed.bogus\".");
    }

    #[test]
    fn test_normalized_descriptors() {
        let declaration = Declaration::new()
            .with("label", property().ty(TypeTag::String).reflect(true).initial("hi"))
            .with("secret", property().internal(true))
            .with("count", property().ty(TypeTag::Number).attribute("item-count"))
            .with("shout", property().input(&["label"]).compute(|_| Ok(Value::Undefined)));
        let schema = PropertySchema::build("TestElement", &declaration).unwrap();

        let label = schema.property("label").unwrap();
        assert_eq!(label.attribute.as_deref(), Some("label"));
        assert!(label.reflect);
        assert!(matches!(label.initial, Some(Initializer::Value(Value::String(ref s))) if s == "hi"));

        let secret = schema.property("secret").unwrap();
        assert_eq!(secret.attribute, None);

        assert_eq!(schema.attribute_owner("item-count"), schema.id_of("count"));
        assert_eq!(schema.attribute_owner("count"), None);
        assert_eq!(schema.observed_attributes(), vec!["label", "item-count", "shout"]);
        assert_eq!(schema.property("shout").unwrap().input, vec!["label".to_string()]);
    }

    #[test]
    fn test_internal_properties_do_not_claim_attributes() {
        let declaration = Declaration::new()
            .with("hidden", property().internal(true))
            .with("other", property().attribute("hidden"));
        assert!(PropertySchema::build("TestElement", &declaration).is_ok());
    }

    #[test]
    fn test_underscores_and_camel_case_map_to_distinct_attributes() {
        let declaration = Declaration::new()
            .with("fooBar", property())
            .with("foo_bar", property())
            .with("private", property())
            .with("_private", property());
        let schema = PropertySchema::build("TestElement", &declaration).unwrap();
        assert_eq!(schema.observed_attributes(), vec!["foo-bar", "foo_bar", "private", "_private"]);
    }

    #[test]
    fn test_computed_may_declare_read_only_false() {
        let declaration = single(
            "derived",
            vec![("compute", noop()), ("input", Declared::Array(vec![])), ("readOnly", false.into())],
        );
        let schema = PropertySchema::build("TestElement", &declaration).unwrap();
        assert!(schema.property("derived").unwrap().is_computed());
    }
}
