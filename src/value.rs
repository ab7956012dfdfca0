//! Value types for mock configuration data.
//!
//! This module provides the `Value` enum that holds the heterogeneous scalar
//! values stored in the mock and override layers, plus `ValueKind` tags used
//! when coercing a value into a typed field.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SourceLocation;

/// Kind tag for a scalar value or a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Boolean
    Bool,
    /// Signed or unsigned integer
    Integer,
    /// Floating-point number
    Float,
    /// UTF-8 string
    String,
}

impl ValueKind {
    /// Human-readable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar value supplied for a dotted path.
///
/// Serializes untagged, so a JSON fixture like `{"port": 8080}` maps onto
/// `Value::Integer(8080)` without any wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// String value
    String(String),
}

impl Value {
    /// Kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a float.
    ///
    /// Integers convert with rounding. Assigning to a float field is
    /// stricter and rejects integers that do not convert exactly.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get a human-readable type name for this value.
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Value::Integer(i64::from(i))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

/// A mock value together with the layer entry it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValue {
    /// The actual value
    pub value: Value,
    /// Where this value came from
    pub source: SourceLocation,
}

impl ConfigValue {
    /// Create a new config value with source tracking.
    pub fn new(value: impl Into<Value>, source: SourceLocation) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Integer(42).as_integer(), Some(42));
        assert_eq!(Value::Float(2.71).as_float(), Some(2.71));
        assert_eq!(Value::Integer(42).as_float(), Some(42.0));
        assert_eq!(Value::String("hello".to_string()).as_str(), Some("hello"));
        assert_eq!(Value::Float(1.5).as_integer(), None);
        assert_eq!(Value::Bool(false).as_str(), None);
    }

    #[test]
    fn test_value_kind() {
        assert_eq!(Value::Bool(true).kind(), ValueKind::Bool);
        assert_eq!(Value::Integer(1).kind(), ValueKind::Integer);
        assert_eq!(Value::Float(1.0).kind(), ValueKind::Float);
        assert_eq!(Value::from("x").kind(), ValueKind::String);
        assert_eq!(Value::Float(2.71).type_name(), "float");
        assert_eq!(ValueKind::Bool.to_string(), "boolean");
    }

    #[test]
    fn test_value_from_conversions() {
        assert_eq!(Value::from(2), Value::Integer(2));
        assert_eq!(Value::from(7u16), Value::Integer(7));
        assert_eq!(Value::from(3.5f32), Value::Float(3.5));
        assert_eq!(Value::from(String::from("a")), Value::String("a".into()));
        assert_eq!(Value::from(false), Value::Bool(false));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from("host").to_string(), "\"host\"");
        assert_eq!(Value::from(8080).to_string(), "8080");
        assert_eq!(Value::from(true).to_string(), "true");
    }

    #[test]
    fn test_value_deserialize_untagged() {
        let v: Value = serde_json::from_str("true").unwrap();
        assert_eq!(v, Value::Bool(true));
        let v: Value = serde_json::from_str("2").unwrap();
        assert_eq!(v, Value::Integer(2));
        let v: Value = serde_json::from_str("3.5").unwrap();
        assert_eq!(v, Value::Float(3.5));
        let v: Value = serde_json::from_str("\"value1\"").unwrap();
        assert_eq!(v, Value::String("value1".into()));
    }

    #[test]
    fn test_config_value() {
        let cv = ConfigValue::new("localhost", SourceLocation::mock("host"));
        assert_eq!(cv.value.as_str(), Some("localhost"));
        assert_eq!(cv.source.to_string(), "mock:host");
    }
}
