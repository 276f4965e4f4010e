//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a pipeline file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A configuration value could not be parsed as the requested type
    #[error("invalid value '{value}' for key '{key}'")]
    InvalidValue {
        /// The configuration key.
        key: String,
        /// The raw value that failed to parse.
        value: String,
    },
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_display_includes_path() {
        let err = ConfigError::read_file("/a/pipeline.toml", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/pipeline.toml"), "got: {msg}");
    }

    #[test]
    fn read_file_source_is_some() {
        let err = ConfigError::read_file("/x", mock_io_err());
        assert!(err.source().is_some());
    }

    #[test]
    fn invalid_value_display() {
        let err = ConfigError::InvalidValue {
            key: "rate".to_string(),
            value: "fast".to_string(),
        };
        assert_eq!(err.to_string(), "invalid value 'fast' for key 'rate'");
    }
}
