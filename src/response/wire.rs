use serde_json::Value;
use uuid::Uuid;

/// Sentinel written for any value that was never set.
pub const PLACEHOLDER: &str = "None";

/// Type tag grid servers put in front of real-valued coordinates.
pub const REAL_TAG: &str = "r";

pub(crate) fn placeholder() -> Value {
    Value::String(PLACEHOLDER.to_string())
}

/// Tag a coordinate, keeping the tag even when the coordinate is unset.
pub(crate) fn tag(value: &Option<String>) -> String {
    format!("{}{}", REAL_TAG, value.as_deref().unwrap_or(PLACEHOLDER))
}

pub(crate) fn tagged_list(values: &[Option<String>]) -> Value {
    Value::Array(values.iter().map(|v| Value::String(tag(v))).collect())
}

/// Inverse of [`tag`]: strips one leading tag and maps the placeholder back to unset.
pub(crate) fn untag(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let value = raw.strip_prefix(REAL_TAG).unwrap_or(raw);
    if value.is_empty() || value == PLACEHOLDER {
        None
    } else {
        Some(value.to_string())
    }
}

pub(crate) fn text(value: &Option<String>) -> Value {
    value.as_ref().map_or_else(placeholder, |v| Value::String(v.clone()))
}

pub(crate) fn uuid(value: &Option<Uuid>) -> Value {
    value.map_or_else(placeholder, |id| Value::String(id.to_string()))
}

pub(crate) fn number<T: Into<Value>>(value: Option<T>) -> Value {
    value.map_or_else(placeholder, Into::into)
}

/// Single-character `"Y"`/`"N"` flag.
pub(crate) fn flag(value: Option<bool>) -> Value {
    match value {
        Some(true) => Value::String("Y".to_string()),
        Some(false) => Value::String("N".to_string()),
        None => placeholder(),
    }
}

/// `"true"`/`"false"` as strings, which is how the login field travels.
pub(crate) fn bool_text(value: Option<bool>) -> Value {
    value.map_or_else(placeholder, |v| Value::String(v.to_string()))
}

pub(crate) fn is_placeholder(value: &Value) -> bool {
    value.is_null() || value.as_str() == Some(PLACEHOLDER)
}
