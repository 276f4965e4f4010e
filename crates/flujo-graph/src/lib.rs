//! Filter graph engine for the flujo audio pipeline.
//!
//! A [`FilterGraph`] is a single-input/single-output chain of processing
//! stages built from a textual description. The host attaches a buffer
//! source bound to its input format and a buffer sink, parses a description
//! into the instance, configures it (which resolves the format every stage
//! will emit), and then streams frames through with [`FilterGraph::push`]
//! and [`FilterGraph::pull`].
//!
//! ## Description grammar
//!
//! ```text
//! chain ::= stage ( ',' stage )*
//! stage ::= name ( '=' arg ( ':' arg )* )?
//! arg   ::= key '=' value | value
//! ```
//!
//! Values may be single-quoted to include separator characters. Examples:
//!
//! ```text
//! volume=volume=2.0
//! volume=0.5, aresample=48000, aformat=sample_fmt=s16
//! ```
//!
//! Two-phase design: parse → [`StageSpec`] list, then build → stages in a
//! graph instance. The parse phase is pure and fully testable without an
//! instance.
//!
//! ## Example
//!
//! ```rust
//! use flujo_graph::{AudioFormat, FilterGraph, Frame, Pull, SampleFormat};
//!
//! # fn main() -> Result<(), flujo_graph::GraphError> {
//! let format = AudioFormat::new(44100, SampleFormat::F32, 2)?;
//!
//! let mut graph = FilterGraph::new();
//! graph.add_source(format)?;
//! graph.add_sink();
//! graph.parse_single_inout("volume=volume=2.0")?;
//! graph.configure()?;
//!
//! let input = Frame::from_interleaved(format, &[0.25, -0.25, 0.5, -0.5])?;
//! graph.push(input)?;
//! match graph.pull()? {
//!     Pull::Frame(frame) => assert_eq!(frame.frame_count(), 2),
//!     other => panic!("expected a frame, got {other:?}"),
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod format;
mod frame;
mod graph;
mod parse;
mod stage;
mod stages;

pub use error::GraphError;
pub use format::{AudioFormat, SampleFormat};
pub use frame::Frame;
pub use graph::{FilterGraph, Pull};
pub use parse::{StageArgs, StageSpec, parse_chain};
pub use stage::Stage;
pub use stages::{MAX_CHANNELS, StageDescriptor, StageRegistry};
