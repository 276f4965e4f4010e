//! Graph filter demo: prepare from configuration, open a stream, and push
//! audio through a declarative chain.
//!
//! Run with: cargo run -p flujo-filter --example graph_demo

use flujo_config::{ConfigBlock, PipelineConfig};
use flujo_filter::{FilterPoll, FilterRegistry};
use flujo_graph::{AudioFormat, Frame, SampleFormat};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    // --- Prepare from a pipeline description ---
    let pipeline = PipelineConfig::from_toml_str(
        r#"
        [[filter]]
        type = "graph"
        graph = "volume=volume=0.5, aresample=48000, aformat=sample_fmt=s16"
        "#,
    )?;

    let registry = FilterRegistry::with_builtins();
    let entry = &pipeline.filters[0];
    let prepared = registry.prepare(&entry.filter_type, &entry.to_block())?;

    // --- Open a stream ---
    let input_format = AudioFormat::new(44100, SampleFormat::F32, 2).unwrap();
    let mut filter = prepared.open(input_format)?;

    println!("input:  {}", filter.input_format());
    println!("output: {}", filter.output_format());

    // --- Stream a second of a 440 Hz tone through the graph ---
    let samples: Vec<f32> = (0..44100)
        .flat_map(|i| {
            let t = i as f32 / 44100.0;
            let s = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.8;
            [s, s]
        })
        .collect();

    let mut produced = 0;
    for chunk in samples.chunks(2048) {
        filter.push(Frame::from_interleaved(input_format, chunk)?)?;
        if let FilterPoll::Frame(frame) = filter.pull()? {
            produced += frame.frame_count();
        }
    }

    filter.flush()?;
    loop {
        match filter.pull()? {
            FilterPoll::Frame(frame) => produced += frame.frame_count(),
            FilterPoll::EndOfStream => break,
            FilterPoll::WouldBlock => unreachable!("flushed"),
        }
    }
    filter.close();

    println!(
        "processed {} input frames into {} output frames",
        samples.len() / 2,
        produced
    );
    Ok(())
}
