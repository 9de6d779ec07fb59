//! Dynamic values carried by props, state, getters and templates.

use std::fmt;

use serde::Serialize;

/// A runtime value.
///
/// Equality is strict in the sense the runtime needs for state writes:
/// numbers compare as `f64`, so the not-a-number sentinel is never equal to
/// itself, and structured payloads compare by content.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Payload of a structured-object property (any JSON kind).
    Object(serde_json::Value),
}

impl Value {
    /// The not-a-number sentinel produced by failed integer parsing.
    pub fn nan() -> Self {
        Value::Number(f64::NAN)
    }

    /// An empty structured value, `{}`.
    pub fn empty_object() -> Self {
        Value::Object(serde_json::Value::Object(serde_json::Map::new()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Number(n) if n.is_nan())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Loose truthiness used by render functions deciding whether to emit
    /// optional markup.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Text(text) => !text.is_empty(),
            Value::Object(_) => true,
        }
    }

    /// Wire form used when the value surfaces as a DOM attribute. `Null`
    /// maps to no attribute at all.
    pub fn to_attribute(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Object(object) => Some(object.to_string()),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(flag) => write!(f, "{flag}"),
            Value::Number(n) => write_number(f, *n),
            Value::Text(text) => f.write_str(text),
            Value::Object(object) => write!(f, "{object}"),
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        write!(f, "{}", n as i128)
    } else {
        write!(f, "{n}")
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::Object(value)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nan_is_never_equal_to_itself() {
        assert_ne!(Value::nan(), Value::nan());
        assert_eq!(Value::from(3), Value::Number(3.0));
    }

    #[test]
    fn display_matches_interpolation_form() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::nan().to_string(), "NaN");
        assert_eq!(Value::from(false).to_string(), "false");
        assert_eq!(Value::from(json!({"a": 1})).to_string(), r#"{"a":1}"#);
    }

    #[test]
    fn attribute_wire_form_is_compact() {
        assert_eq!(Value::Null.to_attribute(), None);
        assert_eq!(Value::from(true).to_attribute().as_deref(), Some("true"));
        assert_eq!(
            Value::from(json!({"data-x": "1", "n": [1, 2]})).to_attribute().as_deref(),
            Some(r#"{"data-x":"1","n":[1,2]}"#)
        );
    }

    #[test]
    fn option_conversion_maps_none_to_null() {
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }
}
