//! Configuration layer for the flujo audio pipeline.
//!
//! This crate provides:
//!
//! - [`ConfigBlock`]: the string key/value store handed to each filter
//!   plugin when it is prepared
//! - [`PipelineConfig`]: a TOML pipeline description listing the filters of
//!   a chain, loadable from a file
//!
//! # Example
//!
//! ```rust
//! use flujo_config::PipelineConfig;
//!
//! let config = PipelineConfig::from_toml_str(r#"
//!     [[filter]]
//!     type = "graph"
//!     graph = "volume=volume=0.5, aresample=48000"
//! "#).unwrap();
//!
//! let block = config.filters[0].to_block();
//! assert_eq!(block.get("graph"), Some("volume=volume=0.5, aresample=48000"));
//! ```

mod block;
mod error;
mod pipeline;

pub use block::ConfigBlock;
pub use error::ConfigError;
pub use pipeline::{FilterEntry, PipelineConfig};
