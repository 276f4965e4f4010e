//! Per-stream audio filters for the flujo pipeline.
//!
//! Filters follow a two-phase contract:
//!
//! 1. **Prepare once**: a [`FilterPlugin`]'s init function turns a
//!    [`ConfigBlock`](flujo_config::ConfigBlock) into a [`PreparedFilter`].
//!    All static validation happens here, so a misconfigured filter is
//!    rejected at load time, never mid-stream.
//! 2. **Open per stream**: [`PreparedFilter::open`] binds the prepared
//!    filter to one stream's input format and returns a [`Filter`]
//!    instance that owns every per-stream resource. The instance reports
//!    the output format the rest of the chain must honor.
//!
//! A prepared filter is read-only after construction and may open any
//! number of concurrent streams; each [`Filter`] belongs to exactly one
//! stream worker.
//!
//! The [`graph`](GRAPH_PLUGIN) plugin delegates per-stream processing to a
//! [`FilterGraph`](flujo_graph::FilterGraph) built from a textual chain
//! description; the [`null`](NULL_PLUGIN) plugin passes audio through
//! untouched.
//!
//! # Example
//!
//! ```rust
//! use flujo_config::ConfigBlock;
//! use flujo_filter::{FilterPoll, FilterRegistry};
//! use flujo_graph::{AudioFormat, Frame, SampleFormat};
//!
//! # fn main() -> Result<(), flujo_filter::FilterError> {
//! let registry = FilterRegistry::with_builtins();
//! let block = ConfigBlock::new().with_value("graph", "volume=volume=2.0");
//! let prepared = registry.prepare("graph", &block)?;
//!
//! let format = AudioFormat::new(44100, SampleFormat::F32, 2).unwrap();
//! let mut filter = prepared.open(format)?;
//! assert_eq!(filter.output_format(), format);
//!
//! filter.push(Frame::from_interleaved(format, &[0.25, -0.25]).unwrap())?;
//! match filter.pull()? {
//!     FilterPoll::Frame(frame) => assert_eq!(frame.frame_count(), 1),
//!     other => panic!("expected a frame, got {other:?}"),
//! }
//! filter.close();
//! # Ok(())
//! # }
//! ```

mod detect;
mod graph_filter;
mod null;
mod plugin;
mod registry;

pub use detect::detect_output_format;
pub use graph_filter::{GRAPH_PLUGIN, GraphFilter, PreparedGraphFilter};
pub use null::NULL_PLUGIN;
pub use plugin::{Filter, FilterPoll, PreparedFilter};
pub use registry::{FilterPlugin, FilterRegistry, PluginInit};

use flujo_graph::GraphError;
use thiserror::Error;

/// Errors surfaced by filter preparation, opening, and streaming.
///
/// Three families, kept on separate variants so the host can tell them
/// apart: configuration errors ([`MissingConfig`](FilterError::MissingConfig),
/// [`UnknownPlugin`](FilterError::UnknownPlugin)) reject the plugin at load
/// time; graph configuration errors ([`GraphConfig`](FilterError::GraphConfig))
/// reject a description at validate or open time, so the stream never
/// starts; processing errors ([`Processing`](FilterError::Processing),
/// [`Closed`](FilterError::Closed)) are stream-fatal but leave the filter
/// closable for cleanup. End-of-stream and not-ready conditions are not
/// errors; they travel as [`FilterPoll`] values.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A required configuration key is missing; no plugin instance is
    /// created.
    #[error("missing \"{0}\" filter configuration")]
    MissingConfig(&'static str),

    /// The requested plugin name is not registered.
    #[error("no such filter plugin: {0}")]
    UnknownPlugin(String),

    /// The graph description was rejected, or its output format could not
    /// be resolved.
    #[error("invalid filter graph: {0}")]
    GraphConfig(#[source] GraphError),

    /// The engine rejected a frame mid-stream.
    #[error("frame rejected by filter graph: {0}")]
    Processing(#[source] GraphError),

    /// Operation on a filter that was already closed.
    #[error("filter is already closed")]
    Closed,
}
