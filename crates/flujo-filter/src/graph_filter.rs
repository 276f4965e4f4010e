//! The graph-backed filter plugin.
//!
//! Delegates per-stream processing to a [`FilterGraph`] built from the
//! `graph` key of the plugin's configuration block. Validation is split in
//! two, matching the filter contract:
//!
//! - prepare time: the description is parsed against a throwaway instance
//!   and discarded, so malformed graphs are rejected before any stream is
//!   accepted;
//! - open time: a fresh instance is built per stream (engines may not
//!   reuse a configured instance), the same description is parsed into it,
//!   and the output format is negotiated by probing the configured sink.

use crate::detect::detect_output_format;
use crate::plugin::{Filter, FilterPoll, PreparedFilter};
use crate::registry::FilterPlugin;
use crate::FilterError;
use flujo_config::ConfigBlock;
use flujo_graph::{AudioFormat, FilterGraph, Frame, Pull};
use tracing::debug;

/// The `graph` filter plugin descriptor.
pub const GRAPH_PLUGIN: FilterPlugin = FilterPlugin {
    name: "graph",
    description: "Process audio through a declarative filter graph",
    init: graph_filter_init,
};

fn graph_filter_init(block: &ConfigBlock) -> Result<Box<dyn PreparedFilter>, FilterError> {
    let description = block.get("graph").ok_or(FilterError::MissingConfig("graph"))?;
    Ok(Box::new(PreparedGraphFilter::new(description)?))
}

/// A validated graph description, ready to open per-stream instances.
///
/// Holds nothing but the description string: the validation parse is
/// discarded, and every open builds a fresh graph instance.
pub struct PreparedGraphFilter {
    description: String,
}

impl PreparedGraphFilter {
    /// Validate `description` and construct the prepared filter.
    ///
    /// Parses the description against a throwaway graph instance and
    /// discards it. Fails with [`FilterError::MissingConfig`] for an empty
    /// description and [`FilterError::GraphConfig`] (carrying the engine's
    /// diagnostic) for grammar or stage errors.
    pub fn new(description: impl Into<String>) -> Result<Self, FilterError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(FilterError::MissingConfig("graph"));
        }

        FilterGraph::check(&description).map_err(FilterError::GraphConfig)?;
        debug!(graph = %description, "validated filter graph description");
        Ok(Self { description })
    }

    /// The validated description string.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PreparedFilter for PreparedGraphFilter {
    fn open(&self, input_format: AudioFormat) -> Result<Box<dyn Filter>, FilterError> {
        let mut graph = FilterGraph::new();
        graph
            .add_source(input_format)
            .map_err(FilterError::GraphConfig)?;
        graph.add_sink();
        graph
            .parse_single_inout(&self.description)
            .map_err(FilterError::GraphConfig)?;
        graph.configure().map_err(FilterError::GraphConfig)?;

        let output_format = detect_output_format(&graph)?;
        debug!(input = %input_format, output = %output_format, "opened graph filter");

        Ok(Box::new(GraphFilter {
            input_format,
            output_format,
            graph: Some(graph),
        }))
    }
}

/// A per-stream graph filter instance.
///
/// Owns one [`FilterGraph`] exclusively. [`close`](Filter::close) drops the
/// instance; afterwards push and pull report [`FilterError::Closed`] while
/// close and flush stay callable.
pub struct GraphFilter {
    input_format: AudioFormat,
    output_format: AudioFormat,
    graph: Option<FilterGraph>,
}

impl GraphFilter {
    fn graph_mut(&mut self) -> Result<&mut FilterGraph, FilterError> {
        self.graph.as_mut().ok_or(FilterError::Closed)
    }
}

impl Filter for GraphFilter {
    fn input_format(&self) -> AudioFormat {
        self.input_format
    }

    fn output_format(&self) -> AudioFormat {
        self.output_format
    }

    fn push(&mut self, frame: Frame) -> Result<(), FilterError> {
        self.graph_mut()?
            .push(frame)
            .map_err(FilterError::Processing)
    }

    fn pull(&mut self) -> Result<FilterPoll, FilterError> {
        match self.graph_mut()?.pull().map_err(FilterError::Processing)? {
            Pull::Frame(frame) => Ok(FilterPoll::Frame(frame)),
            Pull::NotReady => Ok(FilterPoll::WouldBlock),
            Pull::Finished => Ok(FilterPoll::EndOfStream),
        }
    }

    fn flush(&mut self) -> Result<(), FilterError> {
        if let Some(graph) = self.graph.as_mut() {
            graph.push_eof();
        }
        Ok(())
    }

    fn close(&mut self) {
        if self.graph.take().is_some() {
            debug!(input = %self.input_format, "closed graph filter");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flujo_graph::SampleFormat;

    fn f32_stereo() -> AudioFormat {
        AudioFormat::new(44100, SampleFormat::F32, 2).unwrap()
    }

    #[test]
    fn prepare_validates_description() {
        assert!(PreparedGraphFilter::new("volume=volume=2.0").is_ok());
        assert!(matches!(
            PreparedGraphFilter::new("volume='2.0"),
            Err(FilterError::GraphConfig(_))
        ));
    }

    #[test]
    fn prepare_rejects_empty_description() {
        assert!(matches!(
            PreparedGraphFilter::new(""),
            Err(FilterError::MissingConfig("graph"))
        ));
        assert!(matches!(
            PreparedGraphFilter::new("   "),
            Err(FilterError::MissingConfig("graph"))
        ));
    }

    #[test]
    fn init_requires_graph_key() {
        let err = (GRAPH_PLUGIN.init)(&ConfigBlock::new()).err().unwrap();
        assert!(matches!(err, FilterError::MissingConfig("graph")));
    }

    #[test]
    fn open_binds_both_formats() {
        let prepared = PreparedGraphFilter::new("anull").unwrap();
        let filter = prepared.open(f32_stereo()).unwrap();
        assert_eq!(filter.input_format(), f32_stereo());
        assert_eq!(filter.output_format(), f32_stereo());
    }

    #[test]
    fn close_is_idempotent() {
        let prepared = PreparedGraphFilter::new("volume=1.0").unwrap();
        let mut filter = prepared.open(f32_stereo()).unwrap();
        filter.close();
        filter.close();
    }

    #[test]
    fn push_after_close_is_closed_error() {
        let prepared = PreparedGraphFilter::new("anull").unwrap();
        let mut filter = prepared.open(f32_stereo()).unwrap();
        filter.close();

        let frame = Frame::from_interleaved(f32_stereo(), &[0.0, 0.0]).unwrap();
        assert!(matches!(filter.push(frame), Err(FilterError::Closed)));
        assert!(matches!(filter.pull(), Err(FilterError::Closed)));
    }

    #[test]
    fn flush_after_close_is_noop() {
        let prepared = PreparedGraphFilter::new("anull").unwrap();
        let mut filter = prepared.open(f32_stereo()).unwrap();
        filter.close();
        assert!(filter.flush().is_ok());
    }
}
