//! The two-phase filter contract.

use crate::FilterError;
use flujo_graph::{AudioFormat, Frame};

/// Result of polling a filter for output.
///
/// `WouldBlock` and `EndOfStream` are ordinary control flow, deliberately
/// kept off the error channel: "not yet" and "done" must never be
/// conflatable with "broken".
#[derive(Debug)]
pub enum FilterPoll {
    /// A processed buffer in the filter's output format.
    Frame(Frame),
    /// No output available yet; push more input and poll again.
    WouldBlock,
    /// No further output will ever be produced.
    EndOfStream,
}

/// A filter prepared from configuration, not yet bound to any stream.
///
/// Prepared filters are immutable after construction: `open` may be called
/// from any number of stream workers concurrently, and every call produces
/// an independent [`Filter`] with its own resources.
pub trait PreparedFilter: Send + Sync {
    /// Open a per-stream instance bound to `input_format`.
    ///
    /// The returned filter has already negotiated its output format, which
    /// the rest of the stream's chain must honor.
    fn open(&self, input_format: AudioFormat) -> Result<Box<dyn Filter>, FilterError>;
}

/// A per-stream filter instance.
///
/// Exactly one stream worker drives an instance, strictly sequentially;
/// implementations perform no internal locking. Both formats are fixed for
/// the lifetime of the instance.
pub trait Filter: Send {
    /// Format this instance was opened with.
    fn input_format(&self) -> AudioFormat;

    /// Negotiated output format. Stable for the lifetime of the instance.
    fn output_format(&self) -> AudioFormat;

    /// Hand one input frame to the filter. The frame must be encoded in
    /// [`input_format`](Filter::input_format).
    fn push(&mut self, frame: Frame) -> Result<(), FilterError>;

    /// Poll for the next output frame.
    fn pull(&mut self) -> Result<FilterPoll, FilterError>;

    /// Signal that no further input will arrive, so buffered tails can be
    /// drained with [`pull`](Filter::pull). Idempotent; a no-op after
    /// [`close`](Filter::close).
    fn flush(&mut self) -> Result<(), FilterError>;

    /// Release every per-stream resource. Idempotent and callable at any
    /// point, including after errors; there is no way back to a usable
    /// state afterwards.
    fn close(&mut self);
}
