//! Claim value -> header value.

use serde_json::{Map, Number, Value};

/// Outcome of formatting a single claim value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedValue<'a> {
    /// Terminal header value.
    Text(String),
    /// A nested object; the caller walks it with an extended prefix.
    Nested(&'a Map<String, Value>),
}

/// Format a claim value.
///
/// Objects nested inside arrays are not expanded: they are dropped from the
/// joined list, so `[{"x":1}, "y"]` becomes `"y"`.
pub fn format_value(value: &Value) -> FormattedValue<'_> {
    match value {
        Value::Null => FormattedValue::Text(String::new()),
        Value::Bool(b) => FormattedValue::Text(b.to_string()),
        Value::Number(n) => FormattedValue::Text(format_number(n)),
        Value::String(s) => FormattedValue::Text(s.clone()),
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(|item| match format_value(item) {
                    FormattedValue::Text(text) => Some(text),
                    FormattedValue::Nested(_) => None,
                })
                .collect::<Vec<_>>()
                .join(",");
            FormattedValue::Text(joined)
        }
        Value::Object(map) => FormattedValue::Nested(map),
    }
}

// Numbers print as JavaScript's `Number#toString` renders them: plain decimal for
// magnitudes in [1e-6, 1e21), exponent form (`1e+21`, `1e-7`) outside, `-0` as `0`.
fn format_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    let Some(f) = n.as_f64() else {
        return n.to_string();
    };
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        // f64 Display is the shortest round-trip form and never uses an exponent.
        return f.to_string();
    }
    let exp = format!("{f:e}");
    match exp.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exp,
    }
}
