//! Precedence-ordered lookup across value layers
//!
//! Earlier layers win. A usable value is non-empty; empty strings and
//! absent keys are the same outcome, and absence is never an error.

use serde::{Deserialize, Serialize};

use super::layer::{ValueLayer, canonical_key};

/// Conventional name of the secrets layer (highest standard precedence).
pub const SECRETS_LAYER: &str = "secrets";

/// Conventional name of the vars layer.
pub const VARS_LAYER: &str = "vars";

/// Conventional name of the environment layer (lowest standard precedence).
pub const ENVIRONMENT_LAYER: &str = "environment";

/// A resolved variable with its value and originating layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVariable {
    /// Canonical (uppercase) variable name.
    pub name: String,

    /// The resolved value, never empty.
    pub value: String,

    /// Name of the layer that supplied the value.
    pub layer: String,
}

impl ResolvedVariable {
    /// Creates a new resolved variable.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        layer: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            layer: layer.into(),
        }
    }

    /// Returns true if the value came from the conventional secrets layer.
    #[must_use]
    pub fn is_secret(&self) -> bool {
        self.layer == SECRETS_LAYER
    }
}

/// Outcome of resolving one template reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The reference exactly as written in the template.
    pub reference: String,

    /// The resolved variable, when some layer supplied a usable value.
    pub resolved: Option<ResolvedVariable>,
}

impl Resolution {
    /// Returns true if a usable value was found.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// Precedence-ordered list of value layers; the first usable value wins.
///
/// The explicit ordering keeps precedence auditable per lookup and makes a
/// precedence change a reorder of the list rather than a re-merge.
#[derive(Debug, Clone, Default)]
pub struct LayerSet {
    layers: Vec<ValueLayer>,
}

impl LayerSet {
    /// Creates an empty layer set.
    #[must_use]
    pub const fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Builds a set from layers already in precedence order.
    #[must_use]
    pub fn from_layers(layers: Vec<ValueLayer>) -> Self {
        Self { layers }
    }

    /// Builds the standard precedence: secrets, then vars, then environment.
    #[must_use]
    pub fn standard<'a, S, V, E>(secrets: S, vars: V, environment: E) -> Self
    where
        S: IntoIterator<Item = (&'a str, &'a str)>,
        V: IntoIterator<Item = (&'a str, &'a str)>,
        E: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::from_layers(vec![
            ValueLayer::from_pairs(SECRETS_LAYER, secrets),
            ValueLayer::from_pairs(VARS_LAYER, vars),
            ValueLayer::from_pairs(ENVIRONMENT_LAYER, environment),
        ])
    }

    /// Appends a layer at the lowest precedence position.
    pub fn push(&mut self, layer: ValueLayer) {
        self.layers.push(layer);
    }

    /// Appends a layer, builder style.
    #[must_use]
    pub fn with_layer(mut self, layer: ValueLayer) -> Self {
        self.push(layer);
        self
    }

    /// The layers in precedence order.
    #[must_use]
    pub fn layers(&self) -> &[ValueLayer] {
        &self.layers
    }

    /// The number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if the set holds no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Resolves a variable name to its value and originating layer.
    ///
    /// The name is canonicalized to uppercase, then layers are consulted in
    /// order; the first non-empty value wins and no merging happens across
    /// layers. Returns `None` when no layer has a usable value.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<ResolvedVariable> {
        let key = canonical_key(name);
        for layer in &self.layers {
            if let Some(value) = layer.get(&key)
                && !value.is_empty()
            {
                return Some(ResolvedVariable::new(key, value, layer.name()));
            }
        }
        None
    }

    /// Resolves a variable name to just its value.
    #[must_use]
    pub fn resolve_value(&self, name: &str) -> Option<String> {
        self.resolve(name).map(|resolved| resolved.value)
    }

    /// All canonical variable names across all layers, sorted and deduplicated.
    #[must_use]
    pub fn all_variable_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .layers
            .iter()
            .flat_map(ValueLayer::keys)
            .map(String::from)
            .collect();

        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_layers() -> LayerSet {
        LayerSet::standard(
            [("API_KEY", "sk-secret-123")],
            [("HOST", "localhost"), ("API_KEY", "from-vars")],
            [("HOST", "from-env"), ("PORT", "8080")],
        )
    }

    #[test]
    fn test_resolve_not_found() {
        let layers = LayerSet::new();
        assert!(layers.resolve("anything").is_none());
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let layers = create_test_layers();

        let lower = layers.resolve("host").expect("should resolve");
        let mixed = layers.resolve("Host").expect("should resolve");
        let upper = layers.resolve("HOST").expect("should resolve");

        assert_eq!(lower, mixed);
        assert_eq!(mixed, upper);
        assert_eq!(upper.name, "HOST");
        assert_eq!(upper.value, "localhost");
    }

    #[test]
    fn test_precedence_secrets_over_vars_over_environment() {
        let layers = create_test_layers();

        let resolved = layers.resolve("API_KEY").expect("should resolve");
        assert_eq!(resolved.value, "sk-secret-123");
        assert_eq!(resolved.layer, SECRETS_LAYER);

        let resolved = layers.resolve("HOST").expect("should resolve");
        assert_eq!(resolved.value, "localhost");
        assert_eq!(resolved.layer, VARS_LAYER);

        let resolved = layers.resolve("PORT").expect("should resolve");
        assert_eq!(resolved.value, "8080");
        assert_eq!(resolved.layer, ENVIRONMENT_LAYER);
    }

    #[test]
    fn test_precedence_falls_through_empty_layers() {
        let layers = LayerSet::standard([], [("FOO", "v")], [("FOO", "e")]);
        assert_eq!(layers.resolve_value("FOO"), Some("v".to_string()));

        let layers = LayerSet::standard([], [], [("FOO", "e")]);
        assert_eq!(layers.resolve_value("FOO"), Some("e".to_string()));

        let layers = LayerSet::standard([], [], []);
        assert_eq!(layers.resolve_value("FOO"), None);
    }

    #[test]
    fn test_empty_string_value_is_skipped() {
        let layers = LayerSet::standard([("FOO", "")], [("FOO", "fallback")], []);

        let resolved = layers.resolve("FOO").expect("should fall through");
        assert_eq!(resolved.value, "fallback");
        assert_eq!(resolved.layer, VARS_LAYER);
    }

    #[test]
    fn test_empty_string_in_every_layer_is_not_found() {
        let layers = LayerSet::standard([("FOO", "")], [("FOO", "")], []);
        assert!(layers.resolve("FOO").is_none());
    }

    #[test]
    fn test_first_match_short_circuits() {
        // No merging: once secrets answers, lower layers are not consulted.
        let layers = LayerSet::standard([("FOO", "s")], [("FOO", "v")], [("FOO", "e")]);
        assert_eq!(layers.resolve_value("FOO"), Some("s".to_string()));
    }

    #[test]
    fn test_custom_layer_ordering() {
        let layers = LayerSet::new()
            .with_layer(ValueLayer::from_pairs("overrides", [("FOO", "first")]))
            .with_layer(ValueLayer::from_pairs("defaults", [("FOO", "second")]));

        let resolved = layers.resolve("FOO").expect("should resolve");
        assert_eq!(resolved.value, "first");
        assert_eq!(resolved.layer, "overrides");
    }

    #[test]
    fn test_all_variable_names() {
        let layers = create_test_layers();
        assert_eq!(layers.all_variable_names(), vec!["API_KEY", "HOST", "PORT"]);
    }

    #[test]
    fn test_is_secret() {
        let layers = create_test_layers();
        assert!(layers.resolve("API_KEY").expect("resolves").is_secret());
        assert!(!layers.resolve("HOST").expect("resolves").is_secret());
    }

    #[test]
    fn test_resolution_is_resolved() {
        let resolution = Resolution {
            reference: "FOO".to_string(),
            resolved: Some(ResolvedVariable::new("FOO", "v", VARS_LAYER)),
        };
        assert!(resolution.is_resolved());

        let resolution = Resolution {
            reference: "BAR".to_string(),
            resolved: None,
        };
        assert!(!resolution.is_resolved());
    }
}
