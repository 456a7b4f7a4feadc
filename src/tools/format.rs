//! Rendering helpers shared across tools

use serde_json::Value;

use super::Content;

/// Two-space indented JSON
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Treat a `Response` as a list; null, missing or non-array values are empty
pub fn as_list(response: Option<&Value>) -> &[Value] {
    response.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

/// Display a scalar without JSON quoting
pub fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First of `keys` holding a non-empty value, rendered for display
pub fn first_present(object: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|v| !v.is_null() && v.as_str() != Some(""))
        .map(display_scalar)
}

/// Free-form reply: the object as indented JSON.
///
/// Arrays get a count line first so an empty result still reports 0.
pub fn json_report(title: &str, response: Option<&Value>) -> Vec<Content> {
    match response {
        Some(Value::Array(items)) => vec![
            Content::text(format!("{}: {} item(s).", title, items.len())),
            Content::text(pretty_json(&Value::Array(items.clone()))),
        ],
        Some(value) => vec![Content::text(pretty_json(value))],
        None => vec![Content::text(format!("{}: no data returned.", title))],
    }
}
