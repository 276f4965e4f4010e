//! Audio format descriptors.
//!
//! [`AudioFormat`] tags every frame moving through the pipeline and is the
//! value downstream components use for raw byte-width calculations, so a
//! format is never guessed or defaulted: it is either supplied by the host
//! (input side) or resolved by graph configuration (output side).

use crate::error::GraphError;
use std::fmt;
use std::str::FromStr;

/// Raw sample representation of an audio stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// Signed 16-bit integer samples.
    S16,
    /// Signed 32-bit integer samples.
    S32,
    /// 32-bit float samples in [-1.0, 1.0].
    F32,
}

impl SampleFormat {
    /// Size of one sample of this format in bytes.
    pub const fn sample_size(self) -> usize {
        match self {
            SampleFormat::S16 => 2,
            SampleFormat::S32 | SampleFormat::F32 => 4,
        }
    }

    /// Canonical lowercase name (`s16`, `s32`, `f32`).
    pub const fn name(self) -> &'static str {
        match self {
            SampleFormat::S16 => "s16",
            SampleFormat::S32 => "s32",
            SampleFormat::F32 => "f32",
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SampleFormat {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s16" => Ok(SampleFormat::S16),
            "s32" => Ok(SampleFormat::S32),
            "f32" => Ok(SampleFormat::F32),
            other => Err(GraphError::UnknownSampleFormat(other.to_string())),
        }
    }
}

/// Sample rate, sample format, and channel count of an audio stream.
///
/// Displayed as `rate:format:channels`, e.g. `44100:f32:2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Raw sample representation.
    pub sample_format: SampleFormat,
    /// Number of interleaved channels.
    pub channels: u16,
}

impl AudioFormat {
    /// Create a format, rejecting zero sample rates and channel counts.
    pub fn new(
        sample_rate: u32,
        sample_format: SampleFormat,
        channels: u16,
    ) -> Result<Self, GraphError> {
        let format = Self {
            sample_rate,
            sample_format,
            channels,
        };
        format.validate()?;
        Ok(format)
    }

    /// Check the invariants `new` enforces, for formats built field-by-field.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.sample_rate == 0 {
            return Err(GraphError::InvalidFormat("sample rate is zero".to_string()));
        }
        if self.channels == 0 {
            return Err(GraphError::InvalidFormat(
                "channel count is zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Size of one frame (one sample per channel) in bytes.
    pub const fn frame_size(&self) -> usize {
        self.sample_format.sample_size() * self.channels as usize
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.sample_rate, self.sample_format, self.channels
        )
    }
}
