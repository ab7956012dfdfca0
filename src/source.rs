//! Layered path-to-value storage for the mock loader.
//!
//! Each layer of a `MockLoader` is a `ConfigValues`: a map from dotted path
//! to a `ConfigValue` that remembers which layer and path spelling supplied
//! it.

use std::collections::BTreeMap;

#[cfg(feature = "json")]
use crate::error::LoadError;
use crate::error::{Layer, SourceLocation};
use crate::value::{ConfigValue, Value};

/// One layer of mock values, keyed by dotted path.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValues {
    layer: Layer,
    /// Values stored by their dot-notation path (e.g., "Nested.Field3")
    values: BTreeMap<String, ConfigValue>,
}

impl ConfigValues {
    /// Create an empty layer.
    pub fn empty(layer: Layer) -> Self {
        Self {
            layer,
            values: BTreeMap::new(),
        }
    }

    /// Build a layer from `(path, value)` pairs. Later duplicates win.
    pub fn from_pairs<I, K, V>(layer: Layer, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut values = Self::empty(layer);
        for (path, value) in pairs {
            values.set(path, value);
        }
        values
    }

    /// Which layer these values belong to.
    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// Insert or replace the value at `path`, tagging it with this layer.
    pub fn set(&mut self, path: impl Into<String>, value: impl Into<Value>) {
        let path = path.into();
        let source = SourceLocation::new(self.layer, path.clone());
        self.values.insert(path, ConfigValue::new(value, source));
    }

    /// Get a value by path.
    pub fn get(&self, path: &str) -> Option<&ConfigValue> {
        self.values.get(path)
    }

    /// Check if a path exists.
    pub fn contains(&self, path: &str) -> bool {
        self.values.contains_key(path)
    }

    /// Get the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all path-value pairs, sorted by path.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.values.iter()
    }

    /// Get all paths.
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    /// Flatten a JSON object into dotted paths.
    ///
    /// `{"Nested": {"Field3": true}}` becomes `Nested.Field3 = true`. Keys that
    /// already contain dots are kept as written, so `{"Config.Field1": "x"}`
    /// yields the path `Config.Field1`. Arrays and nulls are rejected.
    #[cfg(feature = "json")]
    pub fn from_json(layer: Layer, json: &serde_json::Value) -> Result<Self, LoadError> {
        let mut values = Self::empty(layer);
        match json {
            serde_json::Value::Object(map) => {
                for (key, child) in map {
                    flatten_json(key, child, &mut values)?;
                }
                Ok(values)
            }
            other => Err(LoadError::UnsupportedValue {
                path: String::new(),
                found: json_type_name(other).to_string(),
            }),
        }
    }
}

#[cfg(feature = "json")]
fn flatten_json(
    path: &str,
    json: &serde_json::Value,
    out: &mut ConfigValues,
) -> Result<(), LoadError> {
    use serde_json::Value as Json;

    let scalar = match json {
        Json::Bool(b) => Value::Bool(*b),
        Json::String(s) => Value::String(s.clone()),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => match n.as_f64() {
                Some(f) if n.is_f64() => Value::Float(f),
                _ => {
                    return Err(LoadError::UnsupportedValue {
                        path: path.to_string(),
                        found: format!("number {} out of range", n),
                    })
                }
            },
        },
        Json::Object(map) => {
            for (key, child) in map {
                flatten_json(&format!("{}.{}", path, key), child, out)?;
            }
            return Ok(());
        }
        other => {
            return Err(LoadError::UnsupportedValue {
                path: path.to_string(),
                found: json_type_name(other).to_string(),
            })
        }
    };

    out.set(path, scalar);
    Ok(())
}

#[cfg(feature = "json")]
fn json_type_name(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_values_basic() {
        let mut values = ConfigValues::empty(Layer::Mock);
        assert!(values.is_empty());

        values.set("Nested.Field3", true);

        assert_eq!(values.len(), 1);
        assert!(values.contains("Nested.Field3"));
        assert!(!values.contains("Field3"));

        let val = values.get("Nested.Field3").unwrap();
        assert_eq!(val.value.as_bool(), Some(true));
        assert_eq!(val.source, SourceLocation::mock("Nested.Field3"));
    }

    #[test]
    fn test_set_replaces_earlier_value() {
        let mut values = ConfigValues::empty(Layer::Override);
        values.set("Field1", "first");
        values.set("Field1", "second");

        assert_eq!(values.len(), 1);
        assert_eq!(values.get("Field1").unwrap().value.as_str(), Some("second"));
        assert_eq!(
            values.get("Field1").unwrap().source.to_string(),
            "override:Field1"
        );
    }

    #[test]
    fn test_from_pairs_sorted_iteration() {
        let values = ConfigValues::from_pairs(
            Layer::Mock,
            vec![("b", Value::from(2)), ("a", Value::from(1))],
        );
        let paths: Vec<&String> = values.paths().collect();
        assert_eq!(paths, vec!["a", "b"]);
        assert_eq!(values.layer(), Layer::Mock);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_from_json_flattens_objects() {
        let json = serde_json::json!({
            "Field1": "value1",
            "Field2": 2,
            "Field4": 3.5,
            "Nested": { "Field3": true },
            "Config.Field1": "qualified"
        });

        let values = ConfigValues::from_json(Layer::Mock, &json).unwrap();

        assert_eq!(values.len(), 5);
        assert_eq!(values.get("Field1").unwrap().value, Value::from("value1"));
        assert_eq!(values.get("Field2").unwrap().value, Value::Integer(2));
        assert_eq!(values.get("Field4").unwrap().value, Value::Float(3.5));
        assert_eq!(values.get("Nested.Field3").unwrap().value, Value::Bool(true));
        assert!(values.contains("Config.Field1"));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_from_json_rejects_arrays_and_null() {
        let err = ConfigValues::from_json(Layer::Mock, &serde_json::json!({"hosts": [1, 2]}))
            .unwrap_err();
        assert_eq!(
            err,
            LoadError::UnsupportedValue {
                path: "hosts".to_string(),
                found: "array".to_string(),
            }
        );

        let err = ConfigValues::from_json(Layer::Mock, &serde_json::json!({"a": {"b": null}}))
            .unwrap_err();
        assert_eq!(err.path(), "a.b");

        let err = ConfigValues::from_json(Layer::Mock, &serde_json::json!([1])).unwrap_err();
        assert_eq!(err.path(), "");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_from_json_rejects_huge_unsigned() {
        let err = ConfigValues::from_json(Layer::Mock, &serde_json::json!({"n": u64::MAX}))
            .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
