//! Output format negotiation.

use crate::FilterError;
use flujo_graph::{AudioFormat, FilterGraph, GraphError};

/// Determine the format a configured graph's sink will emit.
///
/// Graph stages may change sample rate, channel count, or sample
/// representation in ways not statically knowable from the description
/// text, so the only reliable answer comes from probing the configured
/// instance. An unresolved sink format is a hard error: downstream
/// components use this value for raw byte-width calculations, and a
/// guessed or defaulted format would corrupt the stream.
pub fn detect_output_format(graph: &FilterGraph) -> Result<AudioFormat, FilterError> {
    let format = graph
        .sink_format()
        .ok_or(FilterError::GraphConfig(GraphError::FormatUnresolved))?;
    format.validate().map_err(FilterError::GraphConfig)?;
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flujo_graph::SampleFormat;

    #[test]
    fn unconfigured_graph_is_rejected() {
        let graph = FilterGraph::new();
        let err = detect_output_format(&graph).unwrap_err();
        assert!(matches!(
            err,
            FilterError::GraphConfig(GraphError::FormatUnresolved)
        ));
    }

    #[test]
    fn configured_graph_reports_sink_format() {
        let format = AudioFormat::new(44100, SampleFormat::F32, 2).unwrap();
        let mut graph = FilterGraph::new();
        graph.add_source(format).unwrap();
        graph.add_sink();
        graph.parse_single_inout("aresample=48000").unwrap();
        graph.configure().unwrap();

        let detected = detect_output_format(&graph).unwrap();
        assert_eq!(detected.sample_rate, 48000);
        assert_eq!(detected.channels, 2);
    }
}
