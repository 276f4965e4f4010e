//! The processing stage trait.

use crate::error::GraphError;
use crate::format::AudioFormat;

/// One processing stage in a filter chain.
///
/// A stage is configured exactly once, before any audio flows: it receives
/// the format produced by the previous stage (or the source endpoint) and
/// answers with the format it will emit. This is how a chain of resampling,
/// remixing, and conversion stages resolves the sink's output format without
/// static analysis of the description text.
///
/// Processing operates on blocks of normalized interleaved `f32` samples at
/// the stage's configured input channel count; the returned block is at the
/// configured output channel count. A stage may hold samples across calls
/// (resampler history, lookahead); whatever remains at end of stream is
/// drained by [`flush`](Stage::flush).
pub trait Stage: Send {
    /// Stage name, for diagnostics and logging.
    fn name(&self) -> &'static str;

    /// Resolve the output format from the input format.
    ///
    /// Called once during graph configuration. Stages that cannot operate
    /// on `input` reject it here, before any stream starts.
    fn configure(&mut self, input: AudioFormat) -> Result<AudioFormat, GraphError>;

    /// Process one block of interleaved samples.
    ///
    /// The returned block may be empty (stage is buffering) or a different
    /// length than the input (rate conversion).
    fn process(&mut self, input: &[f32]) -> Vec<f32>;

    /// Drain samples held back by internal buffering at end of stream.
    ///
    /// Default: nothing held.
    fn flush(&mut self) -> Vec<f32> {
        Vec::new()
    }
}
