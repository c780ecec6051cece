use serde_json::Value;

/// Textual form of a cell. `None` only for JSON null.
pub fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Whether a resolved value is worth rendering.
///
/// Null, blank strings and the literals `null` / `undefined` (left behind when
/// an upstream serializer stringifies a missing value) all count as absent.
pub fn has_content(value: &Value) -> bool {
    match display_text(value) {
        None => false,
        Some(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return false;
            }
            let lowered = trimmed.to_lowercase();
            lowered != "null" && lowered != "undefined"
        }
    }
}

/// Text of the value if it passes [`has_content`].
pub fn content_text(value: &Value) -> Option<String> {
    if has_content(value) {
        display_text(value)
    } else {
        None
    }
}
