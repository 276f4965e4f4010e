//! Error types for graph parsing, configuration, and streaming.

use crate::format::AudioFormat;
use thiserror::Error;

/// Errors from description parsing, graph configuration, or frame streaming.
///
/// Parse variants carry the byte position in the description string so the
/// host can report actionable diagnostics. Streaming variants are raised
/// per frame and are fatal for the stream that triggered them.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The description string is empty or contains only whitespace.
    #[error("empty filter graph description")]
    EmptyDescription,

    /// A stage name is missing (e.g. a dangling `,` separator).
    #[error("empty stage name at position {pos}")]
    EmptyStage {
        /// Byte position in the description string.
        pos: usize,
    },

    /// A single-quoted value was never closed.
    #[error("unterminated quoted value starting at position {pos}")]
    UnterminatedQuote {
        /// Byte position of the opening quote.
        pos: usize,
    },

    /// Unexpected character during parsing.
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar {
        /// Byte position in the description string.
        pos: usize,
        /// The unexpected character.
        ch: char,
    },

    /// The description ended where a value was expected.
    #[error("unexpected end of description at position {pos}")]
    UnexpectedEnd {
        /// Byte position where input ran out.
        pos: usize,
    },

    /// The description names a stage that is not registered.
    #[error("unknown stage '{0}'")]
    UnknownStage(String),

    /// A stage argument is missing, malformed, or out of range.
    #[error("invalid argument for stage '{stage}': {message}")]
    InvalidArg {
        /// Name of the stage that rejected the argument.
        stage: &'static str,
        /// Description of what was wrong.
        message: String,
    },

    /// A sample format name was not recognized.
    #[error("unknown sample format '{0}' (expected s16, s32, or f32)")]
    UnknownSampleFormat(String),

    /// An audio format with a zero sample rate or channel count.
    #[error("invalid audio format: {0}")]
    InvalidFormat(String),

    /// The graph is missing its source or sink endpoint.
    #[error("graph has no {0} endpoint")]
    MissingEndpoint(&'static str),

    /// A chain was already parsed into this graph instance.
    #[error("graph already has a parsed chain")]
    AlreadyParsed,

    /// Streaming was attempted before [`configure`](crate::FilterGraph::configure).
    #[error("graph is not configured")]
    NotConfigured,

    /// The sink's output format could not be resolved during configuration.
    #[error("sink output format is unresolved")]
    FormatUnresolved,

    /// A pushed frame's format does not match the source endpoint's format.
    #[error("frame format {got} does not match source format {expected}")]
    FormatMismatch {
        /// Format the source endpoint was bound to.
        expected: AudioFormat,
        /// Format of the rejected frame.
        got: AudioFormat,
    },

    /// A frame's byte length is not a whole number of frames.
    #[error("frame length {len} is not a multiple of frame size {frame_size}")]
    TruncatedFrame {
        /// Byte length of the rejected buffer.
        len: usize,
        /// Frame size in bytes for the tagged format.
        frame_size: usize,
    },

    /// A frame was pushed after the end-of-stream signal.
    #[error("frame pushed after end of stream")]
    PushAfterEof,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::SampleFormat;

    #[test]
    fn parse_errors_carry_position() {
        let err = GraphError::UnterminatedQuote { pos: 7 };
        assert!(err.to_string().contains('7'));

        let err = GraphError::UnexpectedChar { pos: 3, ch: ')' };
        let msg = err.to_string();
        assert!(msg.contains(')') && msg.contains('3'), "got: {msg}");
    }

    #[test]
    fn format_mismatch_names_both_formats() {
        let expected = AudioFormat::new(44100, SampleFormat::F32, 2).unwrap();
        let got = AudioFormat::new(48000, SampleFormat::S16, 1).unwrap();
        let msg = GraphError::FormatMismatch { expected, got }.to_string();
        assert!(msg.contains("44100:f32:2"), "got: {msg}");
        assert!(msg.contains("48000:s16:1"), "got: {msg}");
    }

    #[test]
    fn unknown_stage_display() {
        let msg = GraphError::UnknownStage("superverb".to_string()).to_string();
        assert_eq!(msg, "unknown stage 'superverb'");
    }
}
