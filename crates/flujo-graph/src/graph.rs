//! The filter graph instance.

use crate::error::GraphError;
use crate::format::AudioFormat;
use crate::frame::Frame;
use crate::parse::parse_chain;
use crate::stage::Stage;
use crate::stages::StageRegistry;
use tracing::{debug, trace};

/// Result of asking the sink endpoint for output.
#[derive(Debug)]
pub enum Pull {
    /// A buffer of processed audio in the sink's format.
    Frame(Frame),
    /// The graph has consumed input but not yet produced output. Push more.
    NotReady,
    /// No further output will ever be produced.
    Finished,
}

/// A single-input/single-output processing graph instance.
///
/// Lifecycle: attach a source bound to the stream's input format and a sink,
/// parse a chain description into the instance, [`configure`] it, then
/// stream frames with [`push`]/[`pull`]. One instance serves exactly one
/// stream and is never reused; dropping it releases everything.
///
/// [`configure`]: FilterGraph::configure
/// [`push`]: FilterGraph::push
/// [`pull`]: FilterGraph::pull
pub struct FilterGraph {
    registry: StageRegistry,
    source_format: Option<AudioFormat>,
    has_sink: bool,
    stages: Vec<Box<dyn Stage>>,
    parsed: bool,
    sink_format: Option<AudioFormat>,
    /// Interleaved samples accumulated at the sink, in the sink's format.
    sink_buffer: Vec<f32>,
    eof: bool,
    drained: bool,
}

impl Default for FilterGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterGraph {
    /// Create an empty graph with no endpoints.
    pub fn new() -> Self {
        Self {
            registry: StageRegistry::new(),
            source_format: None,
            has_sink: false,
            stages: Vec::new(),
            parsed: false,
            sink_format: None,
            sink_buffer: Vec::new(),
            eof: false,
            drained: false,
        }
    }

    /// Validate a chain description against a throwaway instance.
    ///
    /// Parses the description and instantiates every stage, then discards
    /// the lot. Nothing is retained; this exists so malformed descriptions
    /// are rejected at configuration time rather than when a stream opens.
    pub fn check(description: &str) -> Result<(), GraphError> {
        let specs = parse_chain(description)?;
        let registry = StageRegistry::new();
        for spec in &specs {
            registry.create(spec)?;
        }
        Ok(())
    }

    /// Attach the buffer-source endpoint, bound to the stream input format.
    pub fn add_source(&mut self, format: AudioFormat) -> Result<(), GraphError> {
        format.validate()?;
        self.source_format = Some(format);
        Ok(())
    }

    /// Attach the buffer-sink endpoint.
    pub fn add_sink(&mut self) {
        self.has_sink = true;
    }

    /// Parse a chain description and instantiate its stages in this graph.
    ///
    /// May be called once per instance.
    pub fn parse_single_inout(&mut self, description: &str) -> Result<(), GraphError> {
        if self.parsed {
            return Err(GraphError::AlreadyParsed);
        }
        let specs = parse_chain(description)?;
        for spec in &specs {
            self.stages.push(self.registry.create(spec)?);
        }
        self.parsed = true;
        Ok(())
    }

    /// Resolve formats from source to sink.
    ///
    /// Each stage answers with the format it will emit given its input; the
    /// last answer becomes the sink's output format. Fails if either
    /// endpoint is missing or a stage rejects its input format.
    pub fn configure(&mut self) -> Result<(), GraphError> {
        let source = self
            .source_format
            .ok_or(GraphError::MissingEndpoint("source"))?;
        if !self.has_sink {
            return Err(GraphError::MissingEndpoint("sink"));
        }

        let mut format = source;
        for stage in &mut self.stages {
            format = stage.configure(format)?;
        }
        self.sink_format = Some(format);
        debug!(source = %source, sink = %format, stages = self.stages.len(), "configured filter graph");
        Ok(())
    }

    /// Format the source endpoint was bound to, if attached.
    pub fn source_format(&self) -> Option<AudioFormat> {
        self.source_format
    }

    /// Format the sink will emit. `None` until [`configure`](Self::configure)
    /// has resolved it.
    pub fn sink_format(&self) -> Option<AudioFormat> {
        self.sink_format
    }

    /// Hand a frame to the source endpoint.
    ///
    /// The frame must be encoded in the source format. Rejected after
    /// [`push_eof`](Self::push_eof).
    pub fn push(&mut self, frame: Frame) -> Result<(), GraphError> {
        let source = self.source_format.ok_or(GraphError::NotConfigured)?;
        if self.sink_format.is_none() {
            return Err(GraphError::NotConfigured);
        }
        if self.eof {
            return Err(GraphError::PushAfterEof);
        }
        if frame.format() != source {
            return Err(GraphError::FormatMismatch {
                expected: source,
                got: frame.format(),
            });
        }

        let pushed = frame.frame_count();
        let mut block = frame.to_interleaved();
        for stage in &mut self.stages {
            block = stage.process(&block);
        }
        self.sink_buffer.extend_from_slice(&block);
        trace!(
            pushed,
            buffered = self.sink_buffer.len(),
            "pushed frame through graph"
        );
        Ok(())
    }

    /// Signal that no further input will arrive. Idempotent.
    ///
    /// Samples held inside stages become drainable via
    /// [`pull`](Self::pull), which reports [`Pull::Finished`] once
    /// everything is out.
    pub fn push_eof(&mut self) {
        self.eof = true;
    }

    /// Request the next available buffer from the sink endpoint.
    ///
    /// Returns everything accumulated since the last pull as one frame; the
    /// graph imposes no extra re-blocking.
    pub fn pull(&mut self) -> Result<Pull, GraphError> {
        let sink_format = self.sink_format.ok_or(GraphError::NotConfigured)?;

        if self.eof && !self.drained {
            self.drain_stages();
        }

        if !self.sink_buffer.is_empty() {
            let samples = std::mem::take(&mut self.sink_buffer);
            trace!(pulled = samples.len(), "pulled sink buffer");
            return Ok(Pull::Frame(Frame::from_interleaved(sink_format, &samples)?));
        }

        if self.eof {
            Ok(Pull::Finished)
        } else {
            Ok(Pull::NotReady)
        }
    }

    /// Flush every stage's held tail through the rest of the chain.
    fn drain_stages(&mut self) {
        let count = self.stages.len();
        for i in 0..count {
            let mut tail = self.stages[i].flush();
            for j in (i + 1)..count {
                if tail.is_empty() {
                    break;
                }
                tail = self.stages[j].process(&tail);
            }
            self.sink_buffer.extend_from_slice(&tail);
        }
        self.drained = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::SampleFormat;

    fn f32_stereo() -> AudioFormat {
        AudioFormat::new(44100, SampleFormat::F32, 2).unwrap()
    }

    fn open_graph(description: &str, format: AudioFormat) -> FilterGraph {
        let mut graph = FilterGraph::new();
        graph.add_source(format).unwrap();
        graph.add_sink();
        graph.parse_single_inout(description).unwrap();
        graph.configure().unwrap();
        graph
    }

    #[test]
    fn check_accepts_well_formed() {
        assert!(FilterGraph::check("volume=volume=2.0").is_ok());
        assert!(FilterGraph::check("volume=0.5, aresample=48000, anull").is_ok());
    }

    #[test]
    fn check_rejects_malformed() {
        assert!(FilterGraph::check("").is_err());
        assert!(FilterGraph::check("volume='2.0").is_err());
        assert!(FilterGraph::check("superverb").is_err());
        assert!(FilterGraph::check("volume=1.0,").is_err());
    }

    #[test]
    fn check_retains_nothing() {
        // A fresh graph after check is still unparsed and unconfigured.
        FilterGraph::check("volume=2.0").unwrap();
        let graph = FilterGraph::new();
        assert!(graph.sink_format().is_none());
        assert!(graph.source_format().is_none());
    }

    #[test]
    fn configure_requires_endpoints() {
        let mut graph = FilterGraph::new();
        graph.parse_single_inout("anull").unwrap();
        assert!(matches!(
            graph.configure(),
            Err(GraphError::MissingEndpoint("source"))
        ));

        let mut graph = FilterGraph::new();
        graph.add_source(f32_stereo()).unwrap();
        graph.parse_single_inout("anull").unwrap();
        assert!(matches!(
            graph.configure(),
            Err(GraphError::MissingEndpoint("sink"))
        ));
    }

    #[test]
    fn parse_twice_rejected() {
        let mut graph = FilterGraph::new();
        graph.parse_single_inout("anull").unwrap();
        assert!(matches!(
            graph.parse_single_inout("anull"),
            Err(GraphError::AlreadyParsed)
        ));
    }

    #[test]
    fn empty_chain_passes_audio_unchanged() {
        // A graph with no stages still resolves the sink format.
        let mut graph = FilterGraph::new();
        graph.add_source(f32_stereo()).unwrap();
        graph.add_sink();
        graph.configure().unwrap();
        assert_eq!(graph.sink_format(), Some(f32_stereo()));
    }

    #[test]
    fn sink_format_resolves_through_chain() {
        let graph = open_graph(
            "aresample=48000, aformat=sample_fmt=s16, channelmix=1",
            f32_stereo(),
        );
        let sink = graph.sink_format().unwrap();
        assert_eq!(sink.sample_rate, 48000);
        assert_eq!(sink.sample_format, SampleFormat::S16);
        assert_eq!(sink.channels, 1);
    }

    #[test]
    fn push_pull_volume() {
        let mut graph = open_graph("volume=volume=2.0", f32_stereo());
        let frame = Frame::from_interleaved(f32_stereo(), &[0.1, -0.1, 0.2, -0.2]).unwrap();
        graph.push(frame).unwrap();

        match graph.pull().unwrap() {
            Pull::Frame(out) => {
                assert_eq!(out.format(), f32_stereo());
                let samples = out.to_interleaved();
                assert_eq!(samples, vec![0.2, -0.2, 0.4, -0.4]);
            }
            other => panic!("expected frame, got {other:?}"),
        }
    }

    #[test]
    fn pull_before_push_not_ready() {
        let mut graph = open_graph("volume=1.0", f32_stereo());
        assert!(matches!(graph.pull().unwrap(), Pull::NotReady));
    }

    #[test]
    fn push_format_mismatch_rejected() {
        let mut graph = open_graph("anull", f32_stereo());
        let wrong = AudioFormat::new(48000, SampleFormat::S16, 1).unwrap();
        let frame = Frame::from_interleaved(wrong, &[0.0]).unwrap();
        assert!(matches!(
            graph.push(frame),
            Err(GraphError::FormatMismatch { .. })
        ));
    }

    #[test]
    fn push_before_configure_rejected() {
        let mut graph = FilterGraph::new();
        graph.add_source(f32_stereo()).unwrap();
        graph.add_sink();
        graph.parse_single_inout("anull").unwrap();
        let frame = Frame::from_interleaved(f32_stereo(), &[0.0, 0.0]).unwrap();
        assert!(matches!(graph.push(frame), Err(GraphError::NotConfigured)));
    }

    #[test]
    fn eof_then_finished() {
        let mut graph = open_graph("volume=1.0", f32_stereo());
        let frame = Frame::from_interleaved(f32_stereo(), &[0.1, 0.2]).unwrap();
        graph.push(frame).unwrap();
        graph.push_eof();

        assert!(matches!(graph.pull().unwrap(), Pull::Frame(_)));
        assert!(matches!(graph.pull().unwrap(), Pull::Finished));
        // Still finished on repeated pulls.
        assert!(matches!(graph.pull().unwrap(), Pull::Finished));
    }

    #[test]
    fn push_after_eof_rejected() {
        let mut graph = open_graph("anull", f32_stereo());
        graph.push_eof();
        let frame = Frame::from_interleaved(f32_stereo(), &[0.0, 0.0]).unwrap();
        assert!(matches!(graph.push(frame), Err(GraphError::PushAfterEof)));
    }

    #[test]
    fn eof_drains_resampler_tail() {
        let mono = AudioFormat::new(44100, SampleFormat::F32, 1).unwrap();
        let mut graph = open_graph("aresample=44100", mono);

        let input: Vec<f32> = (0..64).map(|i| i as f32 / 64.0).collect();
        graph
            .push(Frame::from_interleaved(mono, &input).unwrap())
            .unwrap();

        let first = match graph.pull().unwrap() {
            Pull::Frame(frame) => frame.frame_count(),
            other => panic!("expected frame, got {other:?}"),
        };
        assert_eq!(first, 63);

        graph.push_eof();
        let tail = match graph.pull().unwrap() {
            Pull::Frame(frame) => frame.frame_count(),
            other => panic!("expected tail frame, got {other:?}"),
        };
        assert_eq!(tail, 1);
        assert!(matches!(graph.pull().unwrap(), Pull::Finished));
    }
}
