use serde::Deserialize;
use std::fmt;

/// Names of the DOM attributes the binding layer reads, plus binding defaults.
///
/// Every field is optional in TOML; missing fields keep the defaults below.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Direct binding attribute; also marks wildcard forms (`data-model="*"`).
    pub model_attribute: String,
    /// Generic value override read before the element's own value.
    pub value_attribute: String,
    /// Form-level model value that enables `name`-based binding for descendants.
    pub wildcard: String,
    /// Used by a bare `debounce` modifier.
    pub default_debounce_ms: u64,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            model_attribute: "data-model".to_string(),
            value_attribute: "data-value".to_string(),
            wildcard: "*".to_string(),
            default_debounce_ms: 150,
        }
    }
}

impl BindingConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(ConfigError)
    }
}

#[derive(Debug)]
pub struct ConfigError(toml::de::Error);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid binding config: {}", self.0)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_keeps_defaults() {
        assert_eq!(
            BindingConfig::from_toml_str("").unwrap(),
            BindingConfig::default()
        );
    }

    #[test]
    fn partial_toml_overrides_named_fields() {
        let config = BindingConfig::from_toml_str(
            r#"
            model_attribute = "data-live-model"
            default_debounce_ms = 300
            "#,
        )
        .unwrap();
        assert_eq!(config.model_attribute, "data-live-model");
        assert_eq!(config.value_attribute, "data-value");
        assert_eq!(config.default_debounce_ms, 300);
    }

    #[test]
    fn wrong_types_are_reported() {
        let err = BindingConfig::from_toml_str("default_debounce_ms = \"soon\"").unwrap_err();
        assert!(err.to_string().starts_with("invalid binding config"));
    }
}
