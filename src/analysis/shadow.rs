//! Detects declarations that collide with the inherited element surface.
//!
//! Colliding with the framework base class is fatal. Everything else is a
//! warning: the component still works, but the host's own behavior for that
//! name or attribute is no longer guaranteed.

use super::interface::InheritedInterface;
use crate::store::schema::PropertySchema;
use crate::validation::error::SchemaError;
use serde::Serialize;
use std::fmt;

/// A non-fatal shadowing diagnostic. `Display` renders the author-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ShadowWarning {
    /// The property name exists on the native prototype chain.
    InheritedProperty { path: String },
    /// The attribute is one the native element already interprets.
    InheritedAttribute { path: String, attribute: String },
    /// The attribute reflects an inherited property under another spelling.
    RelatedProperty { path: String, attribute: String, property: String },
    /// The attribute is present on a freshly created base element.
    DefaultAttribute { path: String, attribute: String },
    DataAttribute { path: String, attribute: String },
    AriaAttribute { path: String, attribute: String },
}

impl ShadowWarning {
    pub fn path(&self) -> &str {
        match self {
            ShadowWarning::InheritedProperty { path }
            | ShadowWarning::InheritedAttribute { path, .. }
            | ShadowWarning::RelatedProperty { path, .. }
            | ShadowWarning::DefaultAttribute { path, .. }
            | ShadowWarning::DataAttribute { path, .. }
            | ShadowWarning::AriaAttribute { path, .. } => path,
        }
    }
}

impl fmt::Display for ShadowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShadowWarning::InheritedProperty { path } => write!(
                f,
                "Unexpected key \"{}\" shadows inherited interface, behavior not guaranteed.",
                path
            ),
            ShadowWarning::InheritedAttribute { path, attribute } => write!(
                f,
                "Unexpected key \"{}\" shadows related inherited attribute \"{}\", behavior not guaranteed.",
                path, attribute
            ),
            ShadowWarning::RelatedProperty { path, attribute, property } => write!(
                f,
                "Unexpected key \"{}\" has attribute \"{}\" which is related to the inherited property \"{}\", behavior not guaranteed.",
                path, attribute, property
            ),
            ShadowWarning::DefaultAttribute { path, attribute } => write!(
                f,
                "Unexpected key \"{}\" has attribute \"{}\" which is inherited, behavior not guaranteed.",
                path, attribute
            ),
            ShadowWarning::DataAttribute { path, attribute } => write!(
                f,
                "Unexpected key \"{}\" has attribute \"{}\" which shadows data-* attribute interface, behavior not guaranteed.",
                path, attribute
            ),
            ShadowWarning::AriaAttribute { path, attribute } => write!(
                f,
                "Unexpected key \"{}\" has attribute \"{}\" which shadows aria-* attribute interface, behavior not guaranteed.",
                path, attribute
            ),
        }
    }
}

/// Checks every property of `schema` against `interface`, in declaration order.
///
/// Fails on the first property that shadows the base class itself. Otherwise
/// returns all warnings, grouped per property.
pub fn analyze(
    schema: &PropertySchema,
    interface: &InheritedInterface,
) -> Result<Vec<ShadowWarning>, SchemaError> {
    let mut warnings = Vec::new();

    for descriptor in schema.descriptors() {
        let path = &descriptor.path;
        if interface.is_reserved(&descriptor.name) {
            return Err(SchemaError::ShadowsReserved {
                path: path.clone(),
                base: interface.base.clone(),
            });
        }

        let attribute = descriptor.attribute.as_deref();
        if interface.has_property(&descriptor.name) {
            warnings.push(ShadowWarning::InheritedProperty { path: path.clone() });
        } else if let Some(attribute) = attribute.filter(|a| interface.has_attribute(a)) {
            warnings.push(ShadowWarning::InheritedAttribute {
                path: path.clone(),
                attribute: attribute.to_string(),
            });
        }

        // Internal properties have no attribute; only the name checks apply.
        let Some(attribute) = attribute else { continue };

        if let Some(property) = interface.related_property(attribute) {
            warnings.push(ShadowWarning::RelatedProperty {
                path: path.clone(),
                attribute: attribute.to_string(),
                property: property.to_string(),
            });
        }
        if interface.is_default_attribute(attribute) {
            warnings.push(ShadowWarning::DefaultAttribute {
                path: path.clone(),
                attribute: attribute.to_string(),
            });
        }
        if attribute.starts_with("data-") {
            warnings.push(ShadowWarning::DataAttribute {
                path: path.clone(),
                attribute: attribute.to_string(),
            });
        } else if attribute.starts_with("aria-") {
            warnings.push(ShadowWarning::AriaAttribute {
                path: path.clone(),
                attribute: attribute.to_string(),
            });
        }
    }
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::declaration::{property, Declaration};
    use crate::store::types::TypeTag;
    use rstest::rstest;

    fn messages(name: &str, declared: Declaration, interface: &InheritedInterface) -> Vec<String> {
        let schema = PropertySchema::build(name, &declared).unwrap();
        analyze(&schema, interface).unwrap().iter().map(ToString::to_string).collect()
    }

    #[rstest]
    #[case::title("title", vec![
        "Unexpected key \"TestElement.properties.title\" shadows inherited interface, behavior not guaranteed.",
        "Unexpected key \"TestElement.properties.title\" has attribute \"title\" which is related to the inherited property \"title\", behavior not guaranteed.",
    ])]
    #[case::class("class", vec![
        "Unexpected key \"TestElement.properties.class\" shadows related inherited attribute \"class\", behavior not guaranteed.",
        "Unexpected key \"TestElement.properties.class\" has attribute \"class\" which is related to the inherited property \"className\", behavior not guaranteed.",
    ])]
    #[case::role("role", vec![
        "Unexpected key \"TestElement.properties.role\" shadows related inherited attribute \"role\", behavior not guaranteed.",
    ])]
    #[case::data("dataFoo", vec![
        "Unexpected key \"TestElement.properties.dataFoo\" has attribute \"data-foo\" which shadows data-* attribute interface, behavior not guaranteed.",
    ])]
    #[case::aria("ariaValueMin", vec![
        "Unexpected key \"TestElement.properties.ariaValueMin\" shadows inherited interface, behavior not guaranteed.",
        "Unexpected key \"TestElement.properties.ariaValueMin\" has attribute \"aria-value-min\" which is related to the inherited property \"ariaValueMin\", behavior not guaranteed.",
        "Unexpected key \"TestElement.properties.ariaValueMin\" has attribute \"aria-value-min\" which shadows aria-* attribute interface, behavior not guaranteed.",
    ])]
    #[case::plain("itemCount", vec![])]
    fn test_shadow_warnings(#[case] name: &str, #[case] expected: Vec<&str>) {
        let declared = Declaration::new().with(name, property().ty(TypeTag::String));
        assert_eq!(messages("TestElement", declared, &InheritedInterface::standard()), expected);
    }

    #[rstest]
    #[case("internal")]
    #[case("render")]
    #[case("connectedCallback")]
    fn test_reserved_shadow_is_fatal(#[case] name: &str) {
        let declared = Declaration::new().with(name, property());
        let schema = PropertySchema::build("TestElement", &declared).unwrap();
        let err = analyze(&schema, &InheritedInterface::standard()).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Unexpected key \"TestElement.properties.{}\" shadows in XElement.prototype interface.", name)
        );
    }

    #[test]
    fn test_internal_property_only_checks_name() {
        let declared = Declaration::new()
            .with("hidden", property().internal(true))
            .with("dataSecret", property().internal(true));
        let got = messages("TestElement", declared, &InheritedInterface::standard());
        assert_eq!(
            got,
            vec!["Unexpected key \"TestElement.properties.hidden\" shadows inherited interface, behavior not guaranteed."]
        );
    }

    #[test]
    fn test_default_attributes_come_from_interface() {
        let interface = InheritedInterface::new("BaseElement").with_default_attribute("tone");
        let declared = Declaration::new().with("tone", property().ty(TypeTag::String));
        assert_eq!(
            messages("TestElement", declared, &interface),
            vec!["Unexpected key \"TestElement.properties.tone\" has attribute \"tone\" which is inherited, behavior not guaranteed."]
        );
    }

    #[test]
    fn test_reserved_base_name_comes_from_interface() {
        let interface = InheritedInterface::new("BaseElement").with_reserved("mount");
        let declared = Declaration::new().with("mount", property());
        let schema = PropertySchema::build("TestElement", &declared).unwrap();
        let err = analyze(&schema, &interface).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected key \"TestElement.properties.mount\" shadows in BaseElement.prototype interface."
        );
    }

    #[test]
    fn test_warnings_serialize_with_kind() {
        let warning = ShadowWarning::DataAttribute { path: "A.properties.dataX".into(), attribute: "data-x".into() };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "dataAttribute");
        assert_eq!(json["attribute"], "data-x");
    }
}
