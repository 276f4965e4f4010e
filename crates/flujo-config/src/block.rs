//! Plugin configuration blocks.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::str::FromStr;

/// String key/value configuration handed to a filter plugin when it is
/// prepared.
///
/// Values are kept as strings so blocks can carry anything from gain values
/// to whole graph descriptions; plugins parse what they need with
/// [`get_parsed`](ConfigBlock::get_parsed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigBlock {
    values: HashMap<String, String>,
}

impl ConfigBlock {
    /// Create an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert or replace a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up a raw value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Look up a value and parse it.
    ///
    /// Returns `Ok(None)` if the key is absent and
    /// [`ConfigError::InvalidValue`] if the value does not parse.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: raw.to_string(),
                }),
        }
    }

    /// Number of entries in the block.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the block has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, String)> for ConfigBlock {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_block() {
        let block = ConfigBlock::new();
        assert!(block.is_empty());
        assert_eq!(block.get("graph"), None);
    }

    #[test]
    fn with_value_builder() {
        let block = ConfigBlock::new()
            .with_value("graph", "volume=2.0")
            .with_value("name", "loud");
        assert_eq!(block.len(), 2);
        assert_eq!(block.get("graph"), Some("volume=2.0"));
    }

    #[test]
    fn get_parsed_absent_is_none() {
        let block = ConfigBlock::new();
        assert_eq!(block.get_parsed::<u32>("rate").unwrap(), None);
    }

    #[test]
    fn get_parsed_valid() {
        let block = ConfigBlock::new().with_value("rate", "48000");
        assert_eq!(block.get_parsed::<u32>("rate").unwrap(), Some(48000));
    }

    #[test]
    fn get_parsed_invalid_is_error() {
        let block = ConfigBlock::new().with_value("rate", "fast");
        let err = block.get_parsed::<u32>("rate").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "rate"));
    }

    #[test]
    fn set_replaces() {
        let mut block = ConfigBlock::new().with_value("graph", "anull");
        block.set("graph", "volume=0.5");
        assert_eq!(block.get("graph"), Some("volume=0.5"));
    }
}
