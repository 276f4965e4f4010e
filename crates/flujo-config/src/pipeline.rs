//! TOML pipeline descriptions.

use crate::block::ConfigBlock;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One filter in a pipeline description.
///
/// The `type` key selects the plugin; every other key is passed through to
/// the plugin's configuration block untouched. All values are strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterEntry {
    /// Plugin name (e.g. "graph", "null").
    #[serde(rename = "type")]
    pub filter_type: String,

    /// Plugin-specific parameters.
    #[serde(flatten)]
    pub params: HashMap<String, String>,
}

impl FilterEntry {
    /// Create an entry with no parameters.
    pub fn new(filter_type: impl Into<String>) -> Self {
        Self {
            filter_type: filter_type.into(),
            params: HashMap::new(),
        }
    }

    /// Builder-style parameter insertion.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Convert the entry's parameters into a plugin configuration block.
    pub fn to_block(&self) -> ConfigBlock {
        self.params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// A pipeline description: the ordered list of filters of one chain.
///
/// ```toml
/// [[filter]]
/// type = "graph"
/// graph = "volume=volume=0.5, aresample=48000"
///
/// [[filter]]
/// type = "null"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Filters in chain order.
    #[serde(default, rename = "filter")]
    pub filters: Vec<FilterEntry>,
}

impl PipelineConfig {
    /// Parse a pipeline description from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a pipeline description from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Serialize back to TOML text.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_filter() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [[filter]]
            type = "graph"
            graph = "volume=volume=2.0"
            "#,
        )
        .unwrap();

        assert_eq!(config.filters.len(), 1);
        assert_eq!(config.filters[0].filter_type, "graph");
        assert_eq!(
            config.filters[0].params.get("graph").map(String::as_str),
            Some("volume=volume=2.0")
        );
    }

    #[test]
    fn parse_multiple_filters_keeps_order() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [[filter]]
            type = "graph"
            graph = "anull"

            [[filter]]
            type = "null"
            "#,
        )
        .unwrap();

        assert_eq!(config.filters.len(), 2);
        assert_eq!(config.filters[0].filter_type, "graph");
        assert_eq!(config.filters[1].filter_type, "null");
    }

    #[test]
    fn missing_type_is_error() {
        let result = PipelineConfig::from_toml_str(
            r#"
            [[filter]]
            graph = "anull"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn empty_document_has_no_filters() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert!(config.filters.is_empty());
    }

    #[test]
    fn to_block_excludes_type() {
        let entry = FilterEntry::new("graph").with_param("graph", "anull");
        let block = entry.to_block();
        assert_eq!(block.get("graph"), Some("anull"));
        assert_eq!(block.get("type"), None);
    }

    #[test]
    fn toml_roundtrip() {
        let config = PipelineConfig {
            filters: vec![FilterEntry::new("graph").with_param("graph", "volume=0.5")],
        };
        let text = config.to_toml_string();
        let reparsed = PipelineConfig::from_toml_str(&text).unwrap();
        assert_eq!(reparsed, config);
    }
}
