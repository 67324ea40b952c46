//! Attribute resolution and collision detection across the full property set.

use crate::store::schema::PropertyDescriptor;
use crate::store::types::PropId;
use crate::validation::error::SchemaError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static CAPITALS: Lazy<Regex> = Lazy::new(|| Regex::new("([A-Z])").expect("capital letter pattern is valid"));

/// The attribute a property maps to when none is given explicitly: a hyphen
/// before every capital letter, then lower-cased. Underscores and runs of
/// capitals are kept as they are (`fooURL` maps to `foo-u-r-l`).
pub fn default_attribute(property: &str) -> String {
    CAPITALS.replace_all(property, "-$1").to_lowercase()
}

/// Fills in implicit attribute names and fails on the second property that
/// resolves to an already-claimed attribute. Internal properties never map to
/// an attribute.
pub(crate) fn resolve_attributes(
    descriptors: &mut [PropertyDescriptor],
) -> Result<HashMap<String, PropId>, SchemaError> {
    let mut claimed = HashMap::with_capacity(descriptors.len());
    for (index, descriptor) in descriptors.iter_mut().enumerate() {
        if descriptor.internal {
            continue;
        }
        let attribute = match &descriptor.attribute {
            Some(explicit) => explicit.clone(),
            None => default_attribute(&descriptor.name),
        };
        descriptor.attribute = Some(attribute.clone());
        if claimed.contains_key(&attribute) {
            return Err(SchemaError::DuplicateAttribute { path: descriptor.path.clone(), attribute });
        }
        claimed.insert(attribute, PropId::new(index));
    }
    Ok(claimed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("title", "title")]
    #[case("dataFoo", "data-foo")]
    #[case("ariaValueMin", "aria-value-min")]
    #[case("booleanValue", "boolean-value")]
    #[case("foo_bar", "foo_bar")]
    #[case("_private", "_private")]
    #[case("fooURL", "foo-u-r-l")]
    fn test_default_attribute(#[case] property: &str, #[case] expected: &str) {
        assert_eq!(default_attribute(property), expected);
    }
}
