//! Dotted-path lookups over a JSON configuration document.
//!
//! A [`ConfigDocument`] wraps the JSON object a host passes to
//! `authenticate`, `refreshToken` or `logout`. Parameters are addressed with
//! dotted keys (`"android.customHandlerClass"`) and coerced to a requested
//! type through [`FromConfigValue`].
//!
//! Every lookup is total: a missing segment, a non-object intermediate value
//! or a failed coercion all resolve to `None` (or the caller's default), so a
//! partially specified document never aborts the caller.
//!
//! # Platform overrides
//!
//! A document may carry per-platform blocks (`"android"`, `"ios"`, `"web"`).
//! [`ConfigDocument::overridden_param`] prefers `android.<key>` over `<key>`
//! whenever the override resolves, even to an empty string. Maps are merged
//! key by key instead, see [`ConfigDocument::overridden_param_map`].
//!
//! # Example
//!
//! ```rust
//! use generic_oauth2::ConfigDocument;
//! use serde_json::json;
//!
//! let doc = ConfigDocument::try_from(json!({
//!     "appId": "web-client",
//!     "android": { "appId": "android-client" },
//!     "first": { "second": { "depth": 2 } }
//! }))
//! .unwrap();
//!
//! assert_eq!(doc.param::<String>("appId").as_deref(), Some("web-client"));
//! assert_eq!(doc.overridden_param::<String>("appId").as_deref(), Some("android-client"));
//! assert_eq!(doc.param::<i32>("first.second.depth"), Some(2));
//! assert_eq!(doc.param_or("first.missing.depth", 7), 7);
//! ```

use std::collections::HashMap;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::Platform;

/// A JSON object holding request configuration.
///
/// The document is immutable for the duration of a request; all accessors
/// borrow it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Map<String, Value>);

// Verify ConfigDocument is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConfigDocument>();
};

impl ConfigDocument {
    /// Wraps an already parsed JSON object.
    #[must_use]
    pub const fn new(root: Map<String, Value>) -> Self {
        Self(root)
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Locates the object that should contain the leaf of `key`.
    ///
    /// The key is split on `.`; every segment except the last must name a
    /// nested object. Returns that object together with the leaf segment, or
    /// `None` when an intermediate segment is missing or not an object. The
    /// leaf itself is not looked up.
    ///
    /// # Example
    ///
    /// ```rust
    /// use generic_oauth2::ConfigDocument;
    /// use serde_json::json;
    ///
    /// let doc = ConfigDocument::try_from(json!({ "a": { "b": { "c": 1 } } })).unwrap();
    ///
    /// let (object, leaf) = doc.resolve_path("a.b.c").unwrap();
    /// assert_eq!(leaf, "c");
    /// assert!(object.contains_key("c"));
    ///
    /// assert!(doc.resolve_path("a.missing.c").is_none());
    /// ```
    #[must_use]
    pub fn resolve_path<'a, 'k>(&'a self, key: &'k str) -> Option<(&'a Map<String, Value>, &'k str)> {
        let Some((parents, leaf)) = key.rsplit_once('.') else {
            return Some((&self.0, key));
        };

        let mut current = &self.0;
        for segment in parents.split('.') {
            current = current.get(segment)?.as_object()?;
        }
        Some((current, leaf))
    }

    /// Returns the raw JSON value at `key`, if any.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        let (object, leaf) = self.resolve_path(key)?;
        object.get(leaf)
    }

    /// Returns the value at `key` coerced to `T`.
    ///
    /// A missing key and a value that does not coerce both yield `None`.
    #[must_use]
    pub fn param<T: FromConfigValue>(&self, key: &str) -> Option<T> {
        self.value(key).and_then(T::from_config_value)
    }

    /// Returns the value at `key` coerced to `T`, or `default`.
    #[must_use]
    pub fn param_or<T: FromConfigValue>(&self, key: &str, default: T) -> T {
        self.param(key).unwrap_or(default)
    }

    /// Flattens the object at `key` into a string map.
    ///
    /// Blank keys and values that do not coerce to a string are skipped. The
    /// map is empty when `key` does not resolve to an object.
    #[must_use]
    pub fn param_map(&self, key: &str) -> HashMap<String, String> {
        let Some(Value::Object(nested)) = self.value(key) else {
            return HashMap::new();
        };

        nested
            .iter()
            .filter(|(name, _)| !name.trim().is_empty())
            .filter_map(|(name, value)| {
                String::from_config_value(value).map(|value| (name.clone(), value))
            })
            .collect()
    }

    /// Returns `key`, superseded by `android.<key>` when that resolves.
    #[must_use]
    pub fn overridden_param<T: FromConfigValue>(&self, key: &str) -> Option<T> {
        self.platform_param(Platform::Android, key)
    }

    /// Returns `key`, superseded by `<platform>.<key>` when that resolves.
    ///
    /// An override that is present but fails coercion leaves the base value
    /// in place. An override that resolves to an empty string wins.
    #[must_use]
    pub fn platform_param<T: FromConfigValue>(&self, platform: Platform, key: &str) -> Option<T> {
        self.param(&platform.override_key(key))
            .or_else(|| self.param(key))
    }

    /// Returns the union of the maps at `key` and `android.<key>`.
    #[must_use]
    pub fn overridden_param_map(&self, key: &str) -> HashMap<String, String> {
        self.platform_param_map(Platform::Android, key)
    }

    /// Returns the union of the maps at `key` and `<platform>.<key>`.
    ///
    /// Entries from the platform block replace base entries with the same
    /// name; entries only present in the base map are kept.
    #[must_use]
    pub fn platform_param_map(&self, platform: Platform, key: &str) -> HashMap<String, String> {
        let mut merged = self.param_map(key);
        merged.extend(self.param_map(&platform.override_key(key)));
        merged
    }
}

impl From<Map<String, Value>> for ConfigDocument {
    fn from(root: Map<String, Value>) -> Self {
        Self(root)
    }
}

impl TryFrom<Value> for ConfigDocument {
    type Error = Value;

    /// Accepts JSON objects and hands any other value back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(root) => Ok(Self(root)),
            other => Err(other),
        }
    }
}

/// Conversion from a JSON value into a typed configuration parameter.
///
/// Implementations return `None` when the value cannot be represented as
/// `Self`; they never panic.
pub trait FromConfigValue: Sized {
    /// Attempts the conversion.
    fn from_config_value(value: &Value) -> Option<Self>;
}

impl FromConfigValue for String {
    /// Strings pass through unchanged; numbers and booleans are rendered.
    fn from_config_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl FromConfigValue for bool {
    /// Accepts booleans and the strings `"true"` / `"false"` in any case.
    fn from_config_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }
}

impl FromConfigValue for f64 {
    fn from_config_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromConfigValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_config_value(value: &Value) -> Option<Self> {
        f64::from_config_value(value).map(|v| v as Self)
    }
}

impl FromConfigValue for i64 {
    /// Integral numbers convert directly, fractional numbers truncate.
    #[allow(clippy::cast_possible_truncation)]
    fn from_config_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as Self)),
            Value::String(s) => {
                let s = s.trim();
                s.parse().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f as Self)
                })
            }
            _ => None,
        }
    }
}

impl FromConfigValue for i32 {
    fn from_config_value(value: &Value) -> Option<Self> {
        i64::from_config_value(value).and_then(|v| Self::try_from(v).ok())
    }
}

/// Returns `length` characters drawn uniformly from `[0-9A-Za-z]`.
///
/// Uses the thread-local cryptographically secure generator, so the output
/// is suitable for `state` values and PKCE verifiers.
///
/// # Example
///
/// ```rust
/// use generic_oauth2::config::random_string;
///
/// let s = random_string(20);
/// assert_eq!(s.len(), 20);
/// assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
#[must_use]
pub fn random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Returns `None` for blank input, otherwise the input untouched.
///
/// # Example
///
/// ```rust
/// use generic_oauth2::config::trim_to_null;
///
/// assert_eq!(trim_to_null("  "), None);
/// assert_eq!(trim_to_null(" a "), Some(" a "));
/// ```
#[must_use]
pub fn trim_to_null<S: AsRef<str>>(value: S) -> Option<S> {
    if value.as_ref().trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_document() -> ConfigDocument {
        ConfigDocument::try_from(json!({
            "doubleValue": 123.4567,
            "floatValue": 123.4,
            "intValue": 1,
            "stringValue": "string",
            "booleanValue": true,
            "accessTokenEndpoint": "https://byteowls.com",
            "first": {
                "second": {
                    "third": {
                        "doubleValue": 5.4,
                        "floatValue": 5.9,
                        "intValue": 2,
                        "stringValue": "stringDeep",
                        "booleanValue": false
                    }
                }
            },
            "map": {
                "key1": "value1",
                "key2": "value2",
                "inMapNullable": "notEmpty"
            },
            "android": {
                "stringValue": "stringAndroid",
                "accessTokenEndpoint": "",
                "map": {
                    "key1": "value1Android",
                    "key3": "value3Android",
                    "inMapNullable": ""
                }
            },
            "empty": "",
            "blank": " "
        }))
        .unwrap()
    }

    fn document(value: Value) -> ConfigDocument {
        ConfigDocument::try_from(value).unwrap()
    }

    #[test]
    fn test_resolve_path_single_segment_uses_root() {
        let doc = base_document();
        let (object, leaf) = doc.resolve_path("stringValue").unwrap();
        assert_eq!(leaf, "stringValue");
        assert!(object.contains_key("first"));
    }

    #[test]
    fn test_resolve_path_descends_all_but_last_segment() {
        let doc = base_document();
        let (object, leaf) = doc.resolve_path("first.second.third").unwrap();
        assert_eq!(leaf, "third");
        assert!(object.get("third").unwrap().is_object());

        let (object, leaf) = doc.resolve_path("first.second.third.intValue").unwrap();
        assert_eq!(leaf, "intValue");
        assert_eq!(object.get("intValue"), Some(&json!(2)));
    }

    #[test]
    fn test_resolve_path_fails_on_missing_or_scalar_intermediate() {
        let doc = base_document();
        assert!(doc.resolve_path("missing.intValue").is_none());
        assert!(doc.resolve_path("stringValue.nested").is_none());
    }

    #[test]
    fn test_resolve_path_does_not_check_leaf() {
        let doc = base_document();
        let (_, leaf) = doc.resolve_path("first.notThere").unwrap();
        assert_eq!(leaf, "notThere");
    }

    #[test]
    fn test_param_string() {
        let doc = base_document();
        assert_eq!(doc.param::<String>("stringValue").as_deref(), Some("string"));
        assert_eq!(
            doc.param::<String>("first.second.third.stringValue").as_deref(),
            Some("stringDeep")
        );
    }

    #[test]
    fn test_param_numeric_types() {
        let doc = base_document();
        assert_eq!(doc.param::<f64>("doubleValue"), Some(123.4567));
        assert_eq!(doc.param::<f32>("floatValue"), Some(123.4_f32));
        assert_eq!(doc.param::<i32>("intValue"), Some(1));
        assert_eq!(doc.param::<i64>("first.second.third.intValue"), Some(2));
        assert_eq!(doc.param::<i64>("doubleValue"), Some(123));
    }

    #[test]
    fn test_param_numeric_from_string() {
        let doc = document(json!({ "port": "8080", "ratio": "0.5", "junk": "abc" }));
        assert_eq!(doc.param::<i32>("port"), Some(8080));
        assert_eq!(doc.param::<f64>("ratio"), Some(0.5));
        assert_eq!(doc.param::<i32>("junk"), None);
    }

    #[test]
    fn test_param_boolean_permissive_parse() {
        let doc = document(json!({ "a": true, "b": "TRUE", "c": "false", "d": "yes", "e": 1 }));
        assert_eq!(doc.param::<bool>("a"), Some(true));
        assert_eq!(doc.param::<bool>("b"), Some(true));
        assert_eq!(doc.param::<bool>("c"), Some(false));
        assert_eq!(doc.param::<bool>("d"), None);
        assert_eq!(doc.param::<bool>("e"), None);
    }

    #[test]
    fn test_param_or_returns_default_on_missing_segment() {
        let doc = base_document();
        assert_eq!(doc.param_or("first.nope.intValue", 42), 42);
        assert_eq!(doc.param_or("nope", "fallback".to_string()), "fallback");
    }

    #[test]
    fn test_param_or_returns_default_on_coercion_failure() {
        let doc = base_document();
        assert!(doc.param_or("stringValue", true));
        assert!(!doc.param_or("stringValue", false));
        assert_eq!(doc.param_or("first", 9), 9);
    }

    #[test]
    fn test_param_string_rejects_objects_and_null() {
        let doc = document(json!({ "obj": { "a": "b" }, "nothing": null, "list": [1] }));
        assert_eq!(doc.param::<String>("obj"), None);
        assert_eq!(doc.param::<String>("nothing"), None);
        assert_eq!(doc.param::<String>("list"), None);
    }

    #[test]
    fn test_param_string_renders_scalars() {
        let doc = base_document();
        assert_eq!(doc.param::<String>("intValue").as_deref(), Some("1"));
        assert_eq!(doc.param::<String>("booleanValue").as_deref(), Some("true"));
    }

    #[test]
    fn test_empty_value_stays_empty() {
        let doc = base_document();
        assert_eq!(doc.param::<String>("empty").as_deref(), Some(""));
        assert_eq!(doc.param_or("empty", "default".to_string()), "");
    }

    #[test]
    fn test_blank_value_stays_blank() {
        let doc = base_document();
        assert_eq!(doc.param::<String>("blank").as_deref(), Some(" "));
    }

    #[test]
    fn test_param_map() {
        let doc = base_document();
        let map = doc.param_map("map");
        assert_eq!(map.get("key1").map(String::as_str), Some("value1"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_param_map_skips_blank_keys_and_non_scalar_values() {
        let doc = document(json!({
            "map": { "": "x", "  ": "y", "ok": "1", "nested": { "a": 1 }, "gone": null, "n": 2 }
        }));
        let map = doc.param_map("map");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("ok").map(String::as_str), Some("1"));
        assert_eq!(map.get("n").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_param_map_is_empty_when_unresolved() {
        let doc = base_document();
        assert!(doc.param_map("missing").is_empty());
        assert!(doc.param_map("stringValue").is_empty());
        assert!(doc.param_map("nope.map").is_empty());
    }

    #[test]
    fn test_param_map_keeps_empty_values() {
        let doc = base_document();
        let map = doc.param_map("android.map");
        assert_eq!(map.get("inMapNullable").map(String::as_str), Some(""));
    }

    #[test]
    fn test_overridden_param_prefers_android_block() {
        let doc = base_document();
        assert_eq!(
            doc.overridden_param::<String>("stringValue").as_deref(),
            Some("stringAndroid")
        );
        assert_eq!(doc.overridden_param::<i32>("intValue"), Some(1));
    }

    #[test]
    fn test_overridden_param_empty_override_wins() {
        let doc = base_document();
        assert!(doc.param::<String>("accessTokenEndpoint").is_some());
        assert_eq!(
            doc.overridden_param::<String>("accessTokenEndpoint").as_deref(),
            Some("")
        );

        let doc = document(json!({ "k": "base", "android": { "k": "" } }));
        assert_eq!(doc.overridden_param::<String>("k").as_deref(), Some(""));
    }

    #[test]
    fn test_overridden_param_without_android_block_keeps_base() {
        let doc = document(json!({ "k": "base" }));
        assert_eq!(doc.overridden_param::<String>("k").as_deref(), Some("base"));
    }

    #[test]
    fn test_overridden_param_uncoercible_override_keeps_base() {
        let doc = document(json!({ "flag": true, "android": { "flag": "maybe" } }));
        assert_eq!(doc.overridden_param::<bool>("flag"), Some(true));
    }

    #[test]
    fn test_overridden_boolean_cases() {
        let cases = [
            (json!({ "pkceEnabled": true, "android": { "pkceEnabled": false } }), "pkceEnabled", Some(false)),
            (json!({ "pkceEnabled": true }), "pkceEnabled", Some(true)),
            (json!({ "pkceEnabled": true }), "android.pkceEnabled", None),
            (json!({ "pkceEnabled": true, "ios": { "pkceEnabled": false } }), "pkceEnabled", Some(true)),
        ];

        for (value, key, expected) in cases {
            let doc = document(value);
            assert_eq!(doc.overridden_param::<bool>(key), expected, "key {key}");
        }
    }

    #[test]
    fn test_platform_param_uses_requested_block() {
        let doc = document(json!({ "pkceEnabled": true, "ios": { "pkceEnabled": false } }));
        assert_eq!(doc.platform_param::<bool>(Platform::Ios, "pkceEnabled"), Some(false));
        assert_eq!(doc.platform_param::<bool>(Platform::Web, "pkceEnabled"), Some(true));
    }

    #[test]
    fn test_overridden_param_map_merges_key_by_key() {
        let doc = base_document();
        let map = doc.overridden_param_map("map");
        assert_eq!(map.get("key1").map(String::as_str), Some("value1Android"));
        assert_eq!(map.get("key2").map(String::as_str), Some("value2"));
        assert_eq!(map.get("key3").map(String::as_str), Some("value3Android"));
        assert_eq!(map.get("inMapNullable").map(String::as_str), Some(""));
    }

    #[test]
    fn test_overridden_param_map_union() {
        let doc = document(json!({
            "map": { "a": "1", "b": "2" },
            "android": { "map": { "a": "9", "c": "3" } }
        }));
        let map = doc.overridden_param_map("map");
        let expected: HashMap<String, String> = [("a", "9"), ("b", "2"), ("c", "3")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(map, expected);
    }

    #[test]
    fn test_try_from_rejects_non_objects() {
        assert!(ConfigDocument::try_from(json!([1, 2])).is_err());
        assert!(ConfigDocument::try_from(json!("text")).is_err());
    }

    #[test]
    fn test_deserializes_from_json_text() {
        let doc: ConfigDocument = serde_json::from_str(r#"{"appId":"abc"}"#).unwrap();
        assert_eq!(doc.param::<String>("appId").as_deref(), Some("abc"));
    }

    #[test]
    fn test_random_string_length_and_alphabet() {
        for length in [0, 1, 8, 20, 64] {
            let s = random_string(length);
            assert_eq!(s.len(), length);
            assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_random_string_is_not_constant() {
        assert_ne!(random_string(32), random_string(32));
    }

    #[test]
    fn test_trim_to_null() {
        assert_eq!(trim_to_null("  "), None);
        assert_eq!(trim_to_null(" "), None);
        assert_eq!(trim_to_null(""), None);
        assert_eq!(trim_to_null("a"), Some("a"));
        assert_eq!(trim_to_null(" a "), Some(" a "));
        assert_eq!(trim_to_null(String::from("x")), Some(String::from("x")));
    }

    #[test]
    fn test_document_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConfigDocument>();
    }
}
