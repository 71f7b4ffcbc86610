//! Rendering options for journey views.

use serde::{Deserialize, Serialize};

/// View settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Claims shown per list in compact summaries before `...`
    pub claim_preview_limit: usize,
    /// Render `Profile not found` lines
    pub show_unresolved: bool,
    /// Render content definition LoadUri/DataUri lines
    pub include_content_uris: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            claim_preview_limit: 3,
            show_unresolved: true,
            include_content_uris: true,
        }
    }
}

impl ViewConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewConfig::default();
        assert_eq!(config.claim_preview_limit, 3);
        assert!(config.show_unresolved);
        assert!(config.include_content_uris);
    }

    #[test]
    fn test_partial_yaml() {
        let config = ViewConfig::from_yaml("claim_preview_limit: 5\n").unwrap();
        assert_eq!(config.claim_preview_limit, 5);
        assert!(config.show_unresolved);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = ViewConfig {
            claim_preview_limit: 1,
            show_unresolved: false,
            include_content_uris: false,
        };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(ViewConfig::from_yaml(&yaml).unwrap(), config);
    }
}
