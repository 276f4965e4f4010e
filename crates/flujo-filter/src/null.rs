//! The pass-through filter plugin.

use crate::plugin::{Filter, FilterPoll, PreparedFilter};
use crate::registry::FilterPlugin;
use crate::FilterError;
use flujo_config::ConfigBlock;
use flujo_graph::{AudioFormat, Frame, GraphError};
use std::collections::VecDeque;

/// The `null` filter plugin descriptor.
///
/// Forwards every frame untouched. Useful for exercising a filter chain
/// without altering audio.
pub const NULL_PLUGIN: FilterPlugin = FilterPlugin {
    name: "null",
    description: "Pass audio through unchanged",
    init: null_filter_init,
};

fn null_filter_init(_block: &ConfigBlock) -> Result<Box<dyn PreparedFilter>, FilterError> {
    Ok(Box::new(PreparedNullFilter))
}

struct PreparedNullFilter;

impl PreparedFilter for PreparedNullFilter {
    fn open(&self, input_format: AudioFormat) -> Result<Box<dyn Filter>, FilterError> {
        input_format.validate().map_err(FilterError::GraphConfig)?;
        Ok(Box::new(NullFilter {
            format: input_format,
            queue: VecDeque::new(),
            eof: false,
            closed: false,
        }))
    }
}

struct NullFilter {
    format: AudioFormat,
    queue: VecDeque<Frame>,
    eof: bool,
    closed: bool,
}

impl Filter for NullFilter {
    fn input_format(&self) -> AudioFormat {
        self.format
    }

    fn output_format(&self) -> AudioFormat {
        self.format
    }

    fn push(&mut self, frame: Frame) -> Result<(), FilterError> {
        if self.closed {
            return Err(FilterError::Closed);
        }
        if self.eof {
            return Err(FilterError::Processing(GraphError::PushAfterEof));
        }
        if frame.format() != self.format {
            return Err(FilterError::Processing(GraphError::FormatMismatch {
                expected: self.format,
                got: frame.format(),
            }));
        }
        self.queue.push_back(frame);
        Ok(())
    }

    fn pull(&mut self) -> Result<FilterPoll, FilterError> {
        if self.closed {
            return Err(FilterError::Closed);
        }
        match self.queue.pop_front() {
            Some(frame) => Ok(FilterPoll::Frame(frame)),
            None if self.eof => Ok(FilterPoll::EndOfStream),
            None => Ok(FilterPoll::WouldBlock),
        }
    }

    fn flush(&mut self) -> Result<(), FilterError> {
        if !self.closed {
            self.eof = true;
        }
        Ok(())
    }

    fn close(&mut self) {
        self.queue.clear();
        self.closed = true;
    }
}
