//! Built-in stages and the stage registry.
//!
//! The registry is the factory table the chain builder consults: each entry
//! pairs a [`StageDescriptor`] with a factory function that turns parsed
//! arguments into a boxed [`Stage`]. Unknown names and bad arguments are
//! rejected here, at configuration time, never mid-stream.

use crate::error::GraphError;
use crate::format::{AudioFormat, SampleFormat};
use crate::parse::{StageArgs, StageSpec};
use crate::stage::Stage;
use tracing::debug;

/// Upper bound on the channel count `channelmix` will produce.
pub const MAX_CHANNELS: u16 = 16;

/// Describes a stage kind in the registry.
#[derive(Debug, Clone)]
pub struct StageDescriptor {
    /// Stage name as written in chain descriptions.
    pub name: &'static str,
    /// Brief description of what the stage does.
    pub description: &'static str,
}

/// Factory function type for creating stages from parsed arguments.
type StageFactory = fn(&StageArgs) -> Result<Box<dyn Stage>, GraphError>;

struct RegistryEntry {
    descriptor: StageDescriptor,
    factory: StageFactory,
}

/// Registry of all available chain stages.
pub struct StageRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StageRegistry {
    /// Create a registry with all built-in stages registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(5),
        };
        registry.register_builtin_stages();
        registry
    }

    fn register_builtin_stages(&mut self) {
        self.register(
            StageDescriptor {
                name: "volume",
                description: "Scalar gain applied to every sample",
            },
            Volume::create,
        );

        self.register(
            StageDescriptor {
                name: "anull",
                description: "Pass audio through unchanged",
            },
            Anull::create,
        );

        self.register(
            StageDescriptor {
                name: "aformat",
                description: "Convert the raw sample representation",
            },
            Aformat::create,
        );

        self.register(
            StageDescriptor {
                name: "aresample",
                description: "Convert the sample rate by linear interpolation",
            },
            Aresample::create,
        );

        self.register(
            StageDescriptor {
                name: "channelmix",
                description: "Change the channel count by mixing or duplication",
            },
            Channelmix::create,
        );
    }

    fn register(&mut self, descriptor: StageDescriptor, factory: StageFactory) {
        self.entries.push(RegistryEntry {
            descriptor,
            factory,
        });
    }

    /// Returns descriptors for all registered stages.
    pub fn all_stages(&self) -> Vec<&StageDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Get a descriptor by stage name.
    pub fn get(&self, name: &str) -> Option<&StageDescriptor> {
        self.entries
            .iter()
            .find(|e| e.descriptor.name == name)
            .map(|e| &e.descriptor)
    }

    /// Instantiate a stage from a parsed specification.
    pub fn create(&self, spec: &StageSpec) -> Result<Box<dyn Stage>, GraphError> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.descriptor.name == spec.name)
            .ok_or_else(|| GraphError::UnknownStage(spec.name.clone()))?;
        (entry.factory)(&spec.args)
    }
}

fn parse_arg<T: std::str::FromStr>(
    stage: &'static str,
    key: &str,
    value: &str,
) -> Result<T, GraphError> {
    value.parse().map_err(|_| GraphError::InvalidArg {
        stage,
        message: format!("cannot parse {key} value '{value}'"),
    })
}

// ---------------------------------------------------------------------------
// volume
// ---------------------------------------------------------------------------

/// Scalar gain. `volume=volume=2.0` or `volume=2.0`. Format-preserving.
struct Volume {
    gain: f32,
}

impl Volume {
    fn create(args: &StageArgs) -> Result<Box<dyn Stage>, GraphError> {
        let gain = match args.get_or_positional("volume", 0) {
            Some(value) => parse_arg("volume", "volume", value)?,
            None => 1.0,
        };
        Ok(Box::new(Self { gain }))
    }
}

impl Stage for Volume {
    fn name(&self) -> &'static str {
        "volume"
    }

    fn configure(&mut self, input: AudioFormat) -> Result<AudioFormat, GraphError> {
        Ok(input)
    }

    fn process(&mut self, input: &[f32]) -> Vec<f32> {
        input.iter().map(|s| s * self.gain).collect()
    }
}

// ---------------------------------------------------------------------------
// anull
// ---------------------------------------------------------------------------

/// Pass-through. Takes no arguments.
struct Anull;

impl Anull {
    fn create(args: &StageArgs) -> Result<Box<dyn Stage>, GraphError> {
        if !args.is_empty() {
            return Err(GraphError::InvalidArg {
                stage: "anull",
                message: "takes no arguments".to_string(),
            });
        }
        Ok(Box::new(Self))
    }
}

impl Stage for Anull {
    fn name(&self) -> &'static str {
        "anull"
    }

    fn configure(&mut self, input: AudioFormat) -> Result<AudioFormat, GraphError> {
        Ok(input)
    }

    fn process(&mut self, input: &[f32]) -> Vec<f32> {
        input.to_vec()
    }
}

// ---------------------------------------------------------------------------
// aformat
// ---------------------------------------------------------------------------

/// Change the raw sample representation tag. `aformat=sample_fmt=s16`.
///
/// Processing itself runs on normalized `f32`; the tag takes effect when the
/// sink encodes pulled frames.
struct Aformat {
    target: SampleFormat,
}

impl Aformat {
    fn create(args: &StageArgs) -> Result<Box<dyn Stage>, GraphError> {
        let value = args
            .get_or_positional("sample_fmt", 0)
            .ok_or_else(|| GraphError::InvalidArg {
                stage: "aformat",
                message: "missing sample_fmt".to_string(),
            })?;
        let target = value.parse()?;
        Ok(Box::new(Self { target }))
    }
}

impl Stage for Aformat {
    fn name(&self) -> &'static str {
        "aformat"
    }

    fn configure(&mut self, input: AudioFormat) -> Result<AudioFormat, GraphError> {
        AudioFormat::new(input.sample_rate, self.target, input.channels)
    }

    fn process(&mut self, input: &[f32]) -> Vec<f32> {
        input.to_vec()
    }
}

// ---------------------------------------------------------------------------
// aresample
// ---------------------------------------------------------------------------

/// Sample rate conversion by linear interpolation.
///
/// `aresample=48000` or `aresample=rate=48000`. Holds the most recent input
/// frame as interpolation history, so the output lags the input by one frame
/// until [`flush`](Stage::flush).
struct Aresample {
    target_rate: u32,
    channels: usize,
    /// Input frames advanced per output frame.
    step: f64,
    /// Position of the next output frame between `prev` (0.0) and the
    /// current input frame (1.0).
    frac: f64,
    prev: Vec<f32>,
    primed: bool,
}

impl Aresample {
    fn create(args: &StageArgs) -> Result<Box<dyn Stage>, GraphError> {
        let value = args
            .get_or_positional("rate", 0)
            .ok_or_else(|| GraphError::InvalidArg {
                stage: "aresample",
                message: "missing rate".to_string(),
            })?;
        let target_rate: u32 = parse_arg("aresample", "rate", value)?;
        if target_rate == 0 {
            return Err(GraphError::InvalidArg {
                stage: "aresample",
                message: "rate must be positive".to_string(),
            });
        }
        Ok(Box::new(Self {
            target_rate,
            channels: 0,
            step: 1.0,
            frac: 0.0,
            prev: Vec::new(),
            primed: false,
        }))
    }
}

impl Stage for Aresample {
    fn name(&self) -> &'static str {
        "aresample"
    }

    fn configure(&mut self, input: AudioFormat) -> Result<AudioFormat, GraphError> {
        self.channels = input.channels as usize;
        self.step = f64::from(input.sample_rate) / f64::from(self.target_rate);
        self.prev = vec![0.0; self.channels];
        AudioFormat::new(self.target_rate, input.sample_format, input.channels)
    }

    fn process(&mut self, input: &[f32]) -> Vec<f32> {
        let mut output = Vec::with_capacity(input.len() + self.channels);
        for frame in input.chunks_exact(self.channels) {
            if !self.primed {
                self.prev.copy_from_slice(frame);
                self.primed = true;
                continue;
            }
            while self.frac < 1.0 {
                let t = self.frac as f32;
                for ch in 0..self.channels {
                    output.push(self.prev[ch] + t * (frame[ch] - self.prev[ch]));
                }
                self.frac += self.step;
            }
            self.frac -= 1.0;
            self.prev.copy_from_slice(frame);
        }
        output
    }

    fn flush(&mut self) -> Vec<f32> {
        // Emit the held frame if an output sample still falls on it.
        if self.primed && self.frac < 1.0 {
            self.primed = false;
            return self.prev.clone();
        }
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// channelmix
// ---------------------------------------------------------------------------

/// Change the channel count. `channelmix=channels=1` or `channelmix=1`.
///
/// Downmix to mono averages all input channels; other conversions copy
/// input channels modularly.
struct Channelmix {
    target: u16,
    in_channels: usize,
}

impl Channelmix {
    fn create(args: &StageArgs) -> Result<Box<dyn Stage>, GraphError> {
        let value = args
            .get_or_positional("channels", 0)
            .ok_or_else(|| GraphError::InvalidArg {
                stage: "channelmix",
                message: "missing channels".to_string(),
            })?;
        let target: u16 = parse_arg("channelmix", "channels", value)?;
        if target == 0 || target > MAX_CHANNELS {
            return Err(GraphError::InvalidArg {
                stage: "channelmix",
                message: format!("channels must be in 1..={MAX_CHANNELS}, got {target}"),
            });
        }
        Ok(Box::new(Self {
            target,
            in_channels: 0,
        }))
    }
}

impl Stage for Channelmix {
    fn name(&self) -> &'static str {
        "channelmix"
    }

    fn configure(&mut self, input: AudioFormat) -> Result<AudioFormat, GraphError> {
        self.in_channels = input.channels as usize;
        debug!(
            from = input.channels,
            to = self.target,
            "configured channel mix"
        );
        AudioFormat::new(input.sample_rate, input.sample_format, self.target)
    }

    fn process(&mut self, input: &[f32]) -> Vec<f32> {
        let out_channels = self.target as usize;
        let frames = input.len() / self.in_channels;
        let mut output = Vec::with_capacity(frames * out_channels);
        for frame in input.chunks_exact(self.in_channels) {
            if out_channels == 1 && self.in_channels > 1 {
                output.push(frame.iter().sum::<f32>() / self.in_channels as f32);
            } else {
                for ch in 0..out_channels {
                    output.push(frame[ch % self.in_channels]);
                }
            }
        }
        output
    }
}
