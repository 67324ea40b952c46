//! Conversions between property values and attribute text.
//!
//! Follows platform attribute conventions: Boolean attributes are presence
//! flags, numbers use the same textual form in both directions, and a missing
//! attribute reads as `Null`.

use crate::store::types::{TypeTag, Value};

/// Renders a number the way the platform does when writing attributes:
/// integral values have no fractional part, `-0` prints as `0`, and
/// magnitudes from `1e21` up or below `1e-6` use exponent form (`1e+21`).
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{}e+{}", mantissa, exponent),
            _ => text,
        }
    } else {
        n.to_string()
    }
}

/// Parses attribute text as a number. Empty (or whitespace) text is `0`,
/// anything that is not a decimal or prefixed integer literal is `NaN`.
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let (sign, unsigned) = match trimmed.as_bytes()[0] {
        b'-' => (-1.0, &trimmed[1..]),
        b'+' => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };
    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }

    let radix = match unsigned.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        // Prefixed literals never carry a sign.
        if sign < 0.0 || trimmed.starts_with('+') {
            return f64::NAN;
        }
        return u64::from_str_radix(&unsigned[2..], radix).map_or(f64::NAN, |n| n as f64);
    }

    // Rust accepts spellings like "inf" and "nan" that attributes do not.
    if !unsigned.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')) {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Whether an attribute can drive a property of this type at all.
pub fn is_attribute_driven(type_tag: Option<&TypeTag>) -> bool {
    type_tag.map_or(true, TypeTag::is_serializable)
}

/// Reads attribute text (`None` when absent) into a property value.
pub fn parse_attribute(type_tag: Option<&TypeTag>, text: Option<&str>) -> Value {
    match (type_tag, text) {
        (Some(TypeTag::Boolean), text) => Value::Boolean(text.is_some()),
        (_, None) => Value::Null,
        (Some(TypeTag::Number), Some(text)) => Value::Number(parse_number(text)),
        (_, Some(text)) => Value::String(text.to_string()),
    }
}

/// The attribute text for a value, or `None` when the attribute should be removed.
pub fn serialize(value: &Value) -> Option<String> {
    match value {
        Value::Boolean(true) => Some(String::new()),
        Value::Boolean(false) | Value::Null | Value::Undefined => None,
        Value::Number(n) => Some(number_to_string(*n)),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) | Value::Custom { .. } => None,
    }
}
