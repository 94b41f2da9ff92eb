//! Configuration values
//!
//! A JSON-shaped tree: booleans, numbers, strings and nested maps.
//! JSON `null` and arrays have no representation and are rejected at parse.
//! Numbers keep their JSON form: integers stay exact and every value is finite.

use alloc::collections::BTreeMap;
use alloc::string::String;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Nested configuration map
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// One configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(Number),
    Text(String),
    Map(ConfigMap),
}

impl ConfigValue {
    /// Finite float as a number value
    pub fn float(n: f64) -> Option<Self> {
        Number::from_f64(n).map(ConfigValue::Number)
    }

    /// Numeric value, if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Short type name used in error details
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Number(_) => "number",
            ConfigValue::Text(_) => "text",
            ConfigValue::Map(_) => "map",
        }
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Number(Number::from(n))
    }
}

impl From<u64> for ConfigValue {
    fn from(n: u64) -> Self {
        ConfigValue::Number(Number::from(n))
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Text(String::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_parse() {
        let map: ConfigMap =
            serde_json::from_str(r#"{"a": 1, "b": true, "c": "x", "d": {"e": 2.5}}"#).unwrap();
        assert_eq!(map["a"], ConfigValue::from(1u64));
        assert_eq!(map["b"], ConfigValue::Bool(true));
        assert_eq!(map["c"].as_text(), Some("x"));
        assert_eq!(map["d"].as_map().and_then(|m| m["e"].as_number()), Some(2.5));
    }

    #[test]
    fn test_numbers_keep_json_form() {
        let map: ConfigMap =
            serde_json::from_str(r#"{"big": 16777217, "neg": -3, "huge": 1e39}"#).unwrap();
        assert_eq!(map["big"].as_number(), Some(16_777_217.0));
        assert_eq!(map["huge"].as_number(), Some(1e39));
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"big":16777217,"huge":1e39,"neg":-3}"#
        );
    }

    #[test]
    fn test_non_finite_float_has_no_value() {
        assert_eq!(ConfigValue::float(f64::NAN), None);
        assert_eq!(ConfigValue::float(f64::INFINITY), None);
        assert_eq!(ConfigValue::float(2.5).and_then(|v| v.as_number()), Some(2.5));
    }

    #[test]
    fn test_null_and_arrays_rejected() {
        assert!(serde_json::from_str::<ConfigMap>(r#"{"a": null}"#).is_err());
        assert!(serde_json::from_str::<ConfigMap>(r#"{"a": [1, 2]}"#).is_err());
    }
}
