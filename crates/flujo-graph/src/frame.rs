//! Raw audio frame buffers.

use crate::error::GraphError;
use crate::format::{AudioFormat, SampleFormat};

/// An opaque buffer of raw interleaved samples tagged with the format it is
/// encoded in.
///
/// A `Frame` always holds a whole number of frames (one sample per channel).
/// Ownership transfers from the host to the graph on push and from the graph
/// back to the host on pull.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    format: AudioFormat,
    data: Vec<u8>,
}

impl Frame {
    /// Wrap raw bytes already encoded in `format`.
    ///
    /// Rejects buffers whose length is not a multiple of the format's frame
    /// size.
    pub fn new(format: AudioFormat, data: Vec<u8>) -> Result<Self, GraphError> {
        format.validate()?;
        let frame_size = format.frame_size();
        if data.len() % frame_size != 0 {
            return Err(GraphError::TruncatedFrame {
                len: data.len(),
                frame_size,
            });
        }
        Ok(Self { format, data })
    }

    /// Encode normalized interleaved `f32` samples into a frame.
    ///
    /// `samples` must hold a whole number of frames for `format`'s channel
    /// count. Integer formats are quantized with clamping to full scale, the
    /// same convention the rest of the pipeline uses for raw sample I/O.
    pub fn from_interleaved(format: AudioFormat, samples: &[f32]) -> Result<Self, GraphError> {
        format.validate()?;
        if samples.len() % format.channels as usize != 0 {
            return Err(GraphError::TruncatedFrame {
                len: samples.len() * format.sample_format.sample_size(),
                frame_size: format.frame_size(),
            });
        }

        let mut data = Vec::with_capacity(samples.len() * format.sample_format.sample_size());
        match format.sample_format {
            SampleFormat::S16 => {
                let max_val = (1i32 << 15) as f32;
                for &s in samples {
                    let v = (s * max_val).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
                    data.extend_from_slice(&v.to_ne_bytes());
                }
            }
            SampleFormat::S32 => {
                let max_val = (1i64 << 31) as f64;
                for &s in samples {
                    let v = (f64::from(s) * max_val).clamp(i32::MIN as f64, i32::MAX as f64) as i32;
                    data.extend_from_slice(&v.to_ne_bytes());
                }
            }
            SampleFormat::F32 => {
                for &s in samples {
                    data.extend_from_slice(&s.to_ne_bytes());
                }
            }
        }

        Ok(Self { format, data })
    }

    /// The format this frame's bytes are encoded in.
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Raw encoded bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the frame, returning its raw bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Number of frames (samples per channel) in the buffer.
    pub fn frame_count(&self) -> usize {
        self.data.len() / self.format.frame_size()
    }

    /// True if the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Decode the buffer into normalized interleaved `f32` samples.
    pub fn to_interleaved(&self) -> Vec<f32> {
        match self.format.sample_format {
            SampleFormat::S16 => {
                let max_val = (1i32 << 15) as f32;
                self.data
                    .chunks_exact(2)
                    .map(|b| i16::from_ne_bytes([b[0], b[1]]) as f32 / max_val)
                    .collect()
            }
            SampleFormat::S32 => {
                let max_val = (1i64 << 31) as f64;
                self.data
                    .chunks_exact(4)
                    .map(|b| {
                        let v = i32::from_ne_bytes([b[0], b[1], b[2], b[3]]);
                        (f64::from(v) / max_val) as f32
                    })
                    .collect()
            }
            SampleFormat::F32 => self
                .data
                .chunks_exact(4)
                .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
                .collect(),
        }
    }
}
