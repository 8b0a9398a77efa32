//! Example: Estimate delays and bearings for a single stereo file
//!
//! Usage:
//!   cargo run --release --example analyze_file -- [--spacing M] [--block-size N] [--swap] <file>

use std::env;

use tdoa_dsp::preprocessing::channel_mixer::ChannelOrder;
use tdoa_dsp::{decode_stereo, direction_of_arrival, BufferedSource, EstimatorConfig, GccPhatEstimator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut config = EstimatorConfig::default();
    let mut order = ChannelOrder::Normal;
    let mut path: Option<String> = None;

    while !args.is_empty() {
        let a = args.remove(0);
        match a.as_str() {
            "--spacing" => {
                config.sensor_spacing = args.first().ok_or("--spacing requires a value")?.parse()?;
                args.remove(0);
            }
            "--block-size" => {
                config.block_size = args.first().ok_or("--block-size requires a value")?.parse()?;
                args.remove(0);
            }
            "--swap" => order = ChannelOrder::Swapped,
            _ => path = Some(a),
        }
    }

    let path = path.ok_or("Usage: analyze_file [--spacing M] [--block-size N] [--swap] <file>")?;

    let decoded = decode_stereo(&path)?;
    config.sample_rate = decoded.sample_rate;
    println!(
        "{}: {:.2} s, {} Hz, {} channels",
        path,
        decoded.duration_seconds(),
        decoded.sample_rate,
        decoded.source_channels
    );

    let (left, right) = order.apply(decoded.left, decoded.right);
    let mut source = BufferedSource::new(left, right, decoded.sample_rate, 1024)?;

    let spacing = config.sensor_spacing;
    let block_seconds = config.block_duration_seconds();
    let mut estimator = GccPhatEstimator::new(config)?;

    let mut block = 0usize;
    estimator.run(&mut source, |estimate| {
        let direction = direction_of_arrival(&estimate, spacing);
        println!(
            "  t={:7.3}s  tau={:+8.4} ms  angle={:+6.1}°  confidence={:.2} ({})",
            block as f32 * block_seconds,
            estimate.tau_ms(),
            direction.angle_degrees,
            direction.confidence,
            estimate.confidence_level()
        );
        block += 1;
    })?;

    let stats = estimator.stats();
    println!(
        "Processed {} blocks, last block {} us, {} deadline misses",
        stats.blocks_processed, stats.last_block_micros, stats.deadline_misses
    );

    Ok(())
}
