//! A single named source of key-value pairs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{DomainError, DomainResult};

/// Canonical form of a variable name: uppercase.
///
/// Lookups are case-insensitive; the canonical spelling is what layers
/// store and what resolution results report.
#[must_use]
pub fn canonical_key(name: &str) -> String {
    name.to_uppercase()
}

/// One named source of key-value pairs (e.g. "secrets", "vars",
/// "environment") participating in precedence-ordered lookup.
///
/// Keys are canonicalized to uppercase on insertion, so lookups are
/// case-insensitive by construction. An empty layer is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueLayer {
    /// Layer name, used for precedence auditing and reporting.
    name: String,

    /// Values keyed by canonical (uppercase) variable name.
    #[serde(default)]
    values: HashMap<String, String>,
}

impl ValueLayer {
    /// Creates an empty layer with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: HashMap::new(),
        }
    }

    /// Builds a layer from key-value pairs, canonicalizing each key.
    #[must_use]
    pub fn from_pairs<I, K, V>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut layer = Self::new(name);
        for (key, value) in pairs {
            layer.set(key, value);
        }
        layer
    }

    /// Builds a layer from a parsed JSON value, which must be an object.
    ///
    /// String values are taken as-is; numbers and booleans are rendered to
    /// their JSON text; `null` entries are dropped (absence and `null` are
    /// indistinguishable to resolution). Arrays and nested objects are
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::LayerNotAnObject`] when the value is not an
    /// object, or [`DomainError::NonScalarValue`] for array/object entries.
    pub fn from_json_object(name: impl Into<String>, value: &Value) -> DomainResult<Self> {
        let name = name.into();
        let Value::Object(entries) = value else {
            return Err(DomainError::LayerNotAnObject(name));
        };

        let mut layer = Self::new(name);
        for (key, entry) in entries {
            match entry {
                Value::Null => {}
                Value::String(text) => layer.set(key.as_str(), text.as_str()),
                Value::Bool(flag) => layer.set(key.as_str(), flag.to_string()),
                Value::Number(number) => layer.set(key.as_str(), number.to_string()),
                Value::Array(_) | Value::Object(_) => {
                    return Err(DomainError::NonScalarValue {
                        layer: layer.name,
                        key: key.clone(),
                    });
                }
            }
        }
        Ok(layer)
    }

    /// Builds a layer from raw JSON text, which must parse to an object.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MalformedLayer`] when the text is not valid
    /// JSON, plus the errors of [`Self::from_json_object`].
    pub fn from_json_str(name: impl Into<String>, raw: &str) -> DomainResult<Self> {
        let name = name.into();
        let value: Value =
            serde_json::from_str(raw).map_err(|source| DomainError::MalformedLayer {
                layer: name.clone(),
                message: source.to_string(),
            })?;
        Self::from_json_object(name, &value)
    }

    /// The layer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds or replaces a value under the canonical form of `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(canonical_key(&key.into()), value.into());
    }

    /// Looks up a value by name, case-insensitively.
    ///
    /// An empty-string value is returned as-is here; treating it as absent
    /// is resolution policy, not storage policy.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&canonical_key(name)).map(String::as_str)
    }

    /// Removes a value by name, case-insensitively.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(&canonical_key(name))
    }

    /// The number of entries in this layer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the layer holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All canonical keys in this layer, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
