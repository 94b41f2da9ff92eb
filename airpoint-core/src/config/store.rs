//! In-memory configuration store
//!
//! Keys are addressed by dotted paths (`pointer.slow_threshold`), one segment
//! per nesting level. Merges are not atomic: the whole document is parsed
//! before anything is touched, but leaves are then applied one at a time in
//! key order and the first invalid leaf stops the merge with earlier leaves
//! already applied.

use alloc::format;
use alloc::string::String;

use crate::error::{ConfigError, KeyError};

use super::tunables::{spec_for, TUNABLES};
use super::value::{ConfigMap, ConfigValue};

/// Maximum bytes in one key segment
pub const MAX_KEY_LEN: usize = 32;

/// Validate a single key segment
pub fn validate_key(key: &str) -> Result<(), KeyError> {
    if key.is_empty() {
        return Err(KeyError::Empty);
    }
    if key.len() > MAX_KEY_LEN {
        return Err(KeyError::TooLong);
    }
    if key.contains('.') {
        return Err(KeyError::ContainsDot);
    }
    Ok(())
}

/// Validate a full path and the value destined for it
pub fn validate_entry(path: &str, value: &ConfigValue) -> Result<(), KeyError> {
    for segment in path.split('.') {
        validate_key(segment)?;
    }
    if let ConfigValue::Number(n) = value {
        if !n.as_f64().is_some_and(f64::is_finite) {
            return Err(KeyError::NotFinite);
        }
    }
    if let Some(spec) = spec_for(path) {
        let n = value.as_number().ok_or(KeyError::NotANumber)?;
        if !spec.accepts(n) {
            return Err(KeyError::OutOfRange);
        }
    }
    Ok(())
}

/// JSON-shaped key/value configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateStore {
    root: ConfigMap,
}

impl StateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            root: ConfigMap::new(),
        }
    }

    /// Create a store holding every tunable at its default
    pub fn with_defaults() -> Self {
        let mut store = Self::new();
        for spec in TUNABLES.iter() {
            insert_path(&mut store.root, spec.path, spec.default_value());
        }
        store
    }

    /// Value at a dotted path
    pub fn get(&self, path: &str) -> Option<&ConfigValue> {
        lookup(&self.root, path)
    }

    /// Number at a dotted path
    pub fn number(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(ConfigValue::as_number)
    }

    /// Validate and store a value
    ///
    /// A map value is applied leaf by leaf, stopping at the first invalid one.
    pub fn set(&mut self, path: &str, value: ConfigValue) -> Result<(), ConfigError> {
        match value {
            ConfigValue::Map(map) => {
                let mut applied = 0;
                self.merge_map(path, map, &mut applied)
            }
            leaf => {
                validate_entry(path, &leaf).map_err(|reason| ConfigError::InvalidKey {
                    path: String::from(path),
                    reason,
                })?;
                insert_path(&mut self.root, path, leaf);
                Ok(())
            }
        }
    }

    /// Number of leaf values
    pub fn len(&self) -> usize {
        count_leaves(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Remove every key
    pub fn clear(&mut self) {
        self.root.clear();
    }

    /// Top-level map
    pub fn root(&self) -> &ConfigMap {
        &self.root
    }

    /// Merge a JSON document, returning the number of leaves applied
    ///
    /// A malformed document leaves the store untouched.
    pub fn merge_json(&mut self, text: &str) -> Result<usize, ConfigError> {
        let map = parse_document(text)?;
        let mut applied = 0;
        self.merge_map("", map, &mut applied)?;
        Ok(applied)
    }

    /// Replace the store with a JSON document
    ///
    /// The document is parsed before the store is cleared.
    pub fn overwrite_json(&mut self, text: &str) -> Result<usize, ConfigError> {
        let map = parse_document(text)?;
        self.root.clear();
        let mut applied = 0;
        self.merge_map("", map, &mut applied)?;
        Ok(applied)
    }

    /// Serialise the store as a JSON object
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(&self.root).map_err(|_| ConfigError::WrongShape)
    }

    fn merge_map(
        &mut self,
        prefix: &str,
        map: ConfigMap,
        applied: &mut usize,
    ) -> Result<(), ConfigError> {
        for (key, value) in map {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            validate_key(&key).map_err(|reason| ConfigError::InvalidKey {
                path: path.clone(),
                reason,
            })?;

            match value {
                ConfigValue::Map(child) => self.merge_map(&path, child, applied)?,
                leaf => {
                    self.set(&path, leaf)?;
                    *applied += 1;
                }
            }
        }
        Ok(())
    }
}

/// Decode UTF-8 payload bytes
pub fn payload_text(bytes: &[u8]) -> Result<&str, ConfigError> {
    core::str::from_utf8(bytes).map_err(|_| ConfigError::NotUtf8)
}

fn parse_document(text: &str) -> Result<ConfigMap, ConfigError> {
    serde_json::from_str::<ConfigMap>(text).map_err(|e| match e.classify() {
        serde_json::error::Category::Data => ConfigError::WrongShape,
        _ => ConfigError::BadJson,
    })
}

fn lookup<'a>(node: &'a ConfigMap, path: &str) -> Option<&'a ConfigValue> {
    match path.split_once('.') {
        None => node.get(path),
        Some((head, rest)) => node.get(head)?.as_map().and_then(|m| lookup(m, rest)),
    }
}

fn insert_path(node: &mut ConfigMap, path: &str, value: ConfigValue) {
    match path.split_once('.') {
        None => {
            node.insert(String::from(path), value);
        }
        Some((head, rest)) => {
            let child = node
                .entry(String::from(head))
                .or_insert_with(|| ConfigValue::Map(ConfigMap::new()));
            match child {
                ConfigValue::Map(map) => insert_path(map, rest, value),
                other => {
                    // A nested write replaces a scalar at the parent path
                    let mut map = ConfigMap::new();
                    insert_path(&mut map, rest, value);
                    *other = ConfigValue::Map(map);
                }
            }
        }
    }
}

fn count_leaves(node: &ConfigMap) -> usize {
    node.values()
        .map(|v| match v {
            ConfigValue::Map(child) => count_leaves(child),
            _ => 1,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tunables::{POINTER_MID_SCALE, POINTER_SLOW_THRESHOLD};

    #[test]
    fn test_defaults_populated() {
        let store = StateStore::with_defaults();
        assert_eq!(store.len(), TUNABLES.len());
        assert_eq!(store.number(POINTER_SLOW_THRESHOLD), Some(1.8));
        assert!(store.get("pointer").and_then(ConfigValue::as_map).is_some());
    }

    #[test]
    fn test_merge_nested_document() {
        let mut store = StateStore::with_defaults();
        let applied = store
            .merge_json(r#"{"pointer": {"mid_scale": 3.0}, "name": "wand"}"#)
            .unwrap();
        assert_eq!(applied, 2);
        assert_eq!(store.number(POINTER_MID_SCALE), Some(3.0));
        assert_eq!(store.get("name").and_then(ConfigValue::as_text), Some("wand"));
        // Siblings untouched
        assert_eq!(store.number(POINTER_SLOW_THRESHOLD), Some(1.8));
    }

    #[test]
    fn test_malformed_leaves_store_untouched() {
        let mut store = StateStore::with_defaults();
        let before = store.clone();

        assert_eq!(store.merge_json("{\"pointer\": "), Err(ConfigError::BadJson));
        assert_eq!(store.merge_json("[1, 2]"), Err(ConfigError::WrongShape));
        assert_eq!(store.merge_json(r#"{"a": null}"#), Err(ConfigError::WrongShape));
        assert_eq!(store.overwrite_json("not json"), Err(ConfigError::BadJson));
        assert_eq!(store, before);
    }

    #[test]
    fn test_partial_merge_keeps_earlier_leaves() {
        let mut store = StateStore::with_defaults();
        // Keys apply in order: a_first, b_bad, c_never
        let err = store
            .merge_json(r#"{"c_never": 1, "a_first": 2, "b_bad": {"": 3}}"#)
            .unwrap_err();

        assert_eq!(
            err,
            ConfigError::InvalidKey {
                path: String::from("b_bad."),
                reason: KeyError::Empty
            }
        );
        assert_eq!(store.number("a_first"), Some(2.0));
        assert_eq!(store.get("c_never"), None);
    }

    #[test]
    fn test_tunable_range_checked() {
        let mut store = StateStore::with_defaults();
        let err = store
            .merge_json(r#"{"pointer": {"fast_scale": 3.5, "mid_scale": 900}}"#)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidKey {
                path: String::from(POINTER_MID_SCALE),
                reason: KeyError::OutOfRange
            }
        );
        // fast_scale sorts first and stays applied
        assert_eq!(store.number("pointer.fast_scale"), Some(3.5));
        assert_eq!(store.number(POINTER_MID_SCALE), Some(2.5));

        let err = store.set(POINTER_MID_SCALE, ConfigValue::from("fast")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidKey {
                reason: KeyError::NotANumber,
                ..
            }
        ));
    }

    #[test]
    fn test_key_validation() {
        assert_eq!(validate_key(""), Err(KeyError::Empty));
        assert_eq!(validate_key("a.b"), Err(KeyError::ContainsDot));
        assert_eq!(validate_key(&"k".repeat(MAX_KEY_LEN + 1)), Err(KeyError::TooLong));
        assert_eq!(validate_key(&"k".repeat(MAX_KEY_LEN)), Ok(()));

        let mut store = StateStore::new();
        let err = store.merge_json(r#"{"a.b": 1}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidKey {
                reason: KeyError::ContainsDot,
                ..
            }
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_overwrite_replaces() {
        let mut store = StateStore::with_defaults();
        store.overwrite_json(r#"{"profile": {"hand": "left"}}"#).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.number(POINTER_SLOW_THRESHOLD), None);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut store = StateStore::new();
        store.merge_json(r#"{"a": {"b": true}, "c": 1.5}"#).unwrap();
        let json = store.to_json().unwrap();
        assert_eq!(json, r#"{"a":{"b":true},"c":1.5}"#);

        let mut copy = StateStore::new();
        copy.merge_json(&json).unwrap();
        assert_eq!(copy, store);
    }

    #[test]
    fn test_saved_document_reloads_intact() {
        let mut store = StateStore::with_defaults();
        store
            .merge_json(
                r#"{"pointer": {"mid_scale": 3.0}, "profile": {"id": 1e39, "serial": 16777217}}"#,
            )
            .unwrap();
        let json = store.to_json().unwrap();
        assert!(json.contains(r#""serial":16777217"#));
        assert!(json.contains(r#""timeout_s":180}"#));
        assert!(!json.contains("null"));

        let mut reloaded = StateStore::with_defaults();
        reloaded.merge_json(&json).unwrap();
        assert_eq!(reloaded, store);
        assert_eq!(reloaded.number(POINTER_MID_SCALE), Some(3.0));
        assert_eq!(reloaded.number("profile.id"), Some(1e39));
        assert_eq!(reloaded.get("profile.serial"), Some(&ConfigValue::from(16_777_217u64)));
    }

    #[test]
    fn test_huge_tunable_out_of_range() {
        let mut store = StateStore::with_defaults();
        let err = store.merge_json(r#"{"pointer": {"mid_scale": 1e39}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidKey {
                reason: KeyError::OutOfRange,
                ..
            }
        ));
        assert_eq!(store.number(POINTER_MID_SCALE), Some(2.5));
    }

    #[test]
    fn test_nested_write_replaces_scalar() {
        let mut store = StateStore::new();
        store.set("mode", ConfigValue::from(1u64)).unwrap();
        store.set("mode.left", ConfigValue::Bool(true)).unwrap();
        assert_eq!(store.get("mode.left"), Some(&ConfigValue::Bool(true)));
    }

    #[test]
    fn test_payload_text() {
        assert_eq!(payload_text(b"{}"), Ok("{}"));
        assert_eq!(payload_text(&[0xFF, 0xFE]), Err(ConfigError::NotUtf8));
    }
}
