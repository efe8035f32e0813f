//! Typed accessors over the untyped request parameter bag.
//!
//! Parameters arrive as a loosely-typed JSON object.  Rather than re-deriving
//! "missing field means default" conversions at every handler, [`Params`]
//! centralizes the contract: each getter takes the default to use when the
//! key is absent or has the wrong type.

use serde_json::{Map, Value};

/// The string-keyed parameter bag of one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    map: Map<String, Value>,
}

impl Params {
    /// An empty bag.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps an already-parsed JSON object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self { map }
    }

    /// True when no parameters were supplied.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// True when `key` is present, whatever its type.
    pub fn has(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// String parameter, or `default` when absent or not a string.
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.map.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    /// Integer parameter.  JSON numbers with a fractional part are
    /// truncated; non-numbers fall back to the default.
    pub fn get_i64(&self, key: &str, default: i64) -> i64 {
        match self.map.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(default),
            _ => default,
        }
    }

    /// Float parameter, or `default` when absent or not a number.
    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.map.get(key).and_then(Value::as_f64).unwrap_or(default)
    }

    /// Boolean parameter, or `default` when absent or not a boolean.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.map.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Array parameter, or an empty slice when absent or not an array.
    pub fn get_array(&self, key: &str) -> &[Value] {
        self.map
            .get(key)
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }

    /// Nested object parameter, or `None` when absent or not an object.
    pub fn get_object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.map.get(key).and_then(Value::as_object)
    }

    /// Raw JSON value for pass-through parameters (e.g. `set_property`'s
    /// `value`, which may be any JSON type).
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// Borrow of the underlying map, for observers that log or forward the
    /// bag verbatim.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.map
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: Value) -> Params {
        match value {
            Value::Object(map) => Params::from_map(map),
            _ => panic!("test bag must be an object"),
        }
    }

    #[test]
    fn string_with_default() {
        let p = bag(json!({"name": "Player"}));
        assert_eq!(p.get_str("name", "NewNode"), "Player");
        assert_eq!(p.get_str("missing", "NewNode"), "NewNode");
        // Wrong type falls back too.
        assert_eq!(p.get_str("name", "x"), "Player");
        assert_eq!(bag(json!({"name": 3})).get_str("name", "fallback"), "fallback");
    }

    #[test]
    fn int_coercion() {
        let p = bag(json!({"depth": 3, "ratio": 2.9}));
        assert_eq!(p.get_i64("depth", 5), 3);
        assert_eq!(p.get_i64("ratio", 0), 2, "fractional numbers truncate");
        assert_eq!(p.get_i64("missing", 5), 5);
        assert_eq!(bag(json!({"depth": "3"})).get_i64("depth", 5), 5);
    }

    #[test]
    fn bool_and_float() {
        let p = bag(json!({"recursive": true, "scale": 1.5}));
        assert!(p.get_bool("recursive", false));
        assert!(!p.get_bool("missing", false));
        assert_eq!(p.get_f64("scale", 0.0), 1.5);
        assert_eq!(p.get_f64("missing", 32.0), 32.0);
    }

    #[test]
    fn arrays_and_objects() {
        let p = bag(json!({"steps": ["a", "b"], "size": {"width": 32}}));
        assert_eq!(p.get_array("steps").len(), 2);
        assert!(p.get_array("missing").is_empty());
        assert_eq!(
            p.get_object("size").and_then(|m| m.get("width")),
            Some(&json!(32))
        );
        assert!(p.get_object("steps").is_none());
    }

    #[test]
    fn raw_value_passthrough() {
        let p = bag(json!({"value": [1, 2, 3]}));
        assert_eq!(p.get_value("value"), Some(&json!([1, 2, 3])));
        assert!(p.get_value("missing").is_none());
        assert!(p.has("value"));
        assert!(!p.has("missing"));
    }
}
