//! Permissive field coercion for untrusted records.
//!
//! Every reader here returns a usable value for missing, null or wrong-typed
//! input. None of them fail.

use causeway_core::record::RecordNode;
use causeway_core::types::{Details, STATUS_CODE_RANGE, UNKNOWN_ERROR_CODE};
use serde_json::Value;

/// Fields consulted, in order, for the subtype tag.
pub const TAG_FIELDS: [&str; 3] = ["subtypeTag", "__type", "name"];

/// JSON truthiness: `null`, `false`, `0`, `""` are false; everything else true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Stringify scalars; objects and arrays render as compact JSON.
fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// The first non-empty string among [`TAG_FIELDS`].
pub fn raw_tag<N: RecordNode>(node: &N) -> Option<&str> {
    TAG_FIELDS
        .iter()
        .filter_map(|f| node.field(f).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

/// `message`, or `""` when falsy.
pub fn message<N: RecordNode>(node: &N) -> String {
    node.field("message")
        .filter(|v| truthy(v))
        .and_then(stringify)
        .unwrap_or_default()
}

/// `name` when it is a non-empty string.
pub fn name<N: RecordNode>(node: &N) -> Option<String> {
    node.field("name")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `statusCode` from a number or numeric string in 100..=999, else `default`.
pub fn status_code<N: RecordNode>(node: &N, default: u16) -> u16 {
    let parsed = match node.field("statusCode") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .filter(|f| {
            *f >= f64::from(*STATUS_CODE_RANGE.start()) && *f <= f64::from(*STATUS_CODE_RANGE.end())
        })
        .map_or(default, |f| f as u16)
}

/// `code` as a non-empty string (numbers stringified), if present.
pub fn code_field<N: RecordNode>(node: &N) -> Option<String> {
    match node.field("code") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// `code`, else `default`.
pub fn code<N: RecordNode>(node: &N, default: &str) -> String {
    code_field(node).unwrap_or_else(|| default.to_string())
}

/// `true` when `code` carries something other than the unknown sentinel.
pub fn has_meaningful_code<N: RecordNode>(node: &N) -> bool {
    code_field(node).is_some_and(|c| c != UNKNOWN_ERROR_CODE)
}

/// `isOperational` by truthiness when present (even if null), else `default`.
pub fn operational<N: RecordNode>(node: &N, default: bool) -> bool {
    node.field("isOperational").map_or(default, truthy)
}

/// `details` when it is an object, else empty.
pub fn details<N: RecordNode>(node: &N) -> Details {
    node.field("details").map(Details::from_json).unwrap_or_default()
}

/// `stack` when it is a non-empty string.
pub fn stack<N: RecordNode>(node: &N) -> Option<String> {
    node.field("stack")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
