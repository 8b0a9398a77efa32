//! Example: Estimate delays for multiple stereo files in parallel
//!
//! Usage:
//!   cargo run --release --example analyze_batch -- [--jobs N] [--json] [--spacing M] <file1> <file2> ...
//!
//! Notes:
//! - Parallelism is across files (batch-level). Each file is still processed by one estimator.
//! - Default workers: (available CPU threads - 1), keeping one core free for the system.

use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::time::Instant;
use tdoa_dsp::{decode_stereo, direction_of_arrival, estimate_delays, EstimatorConfig};

#[derive(Debug, Clone, Serialize)]
struct ItemOut {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    blocks: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    median_tau_ms: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    median_angle_degrees: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mean_confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reliable_fraction: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    processing_time_ms: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ItemOut {
    fn failed(file: String, error: String) -> Self {
        Self {
            file,
            blocks: None,
            median_tau_ms: None,
            median_angle_degrees: None,
            mean_confidence: None,
            reliable_fraction: None,
            processing_time_ms: None,
            error: Some(error),
        }
    }
}

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn percentile(mut xs: Vec<f32>, p: f32) -> Option<f32> {
    if xs.is_empty() {
        return None;
    }
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let idx = ((xs.len() - 1) as f32 * p.clamp(0.0, 1.0)).round() as usize;
    Some(xs[idx.min(xs.len() - 1)])
}

fn analyze(path: &str, base: &EstimatorConfig) -> ItemOut {
    let t0 = Instant::now();
    let decoded = match decode_stereo(path) {
        Ok(d) => d,
        Err(e) => return ItemOut::failed(path.to_string(), format!("decode failed: {e}")),
    };

    let config = EstimatorConfig {
        sample_rate: decoded.sample_rate,
        ..base.clone()
    };
    let estimates = match estimate_delays(&decoded.left, &decoded.right, config) {
        Ok(e) => e,
        Err(e) => return ItemOut::failed(path.to_string(), format!("estimation failed: {e}")),
    };

    let taus: Vec<f32> = estimates.iter().map(|e| e.tau_ms()).collect();
    let angles: Vec<f32> = estimates
        .iter()
        .map(|e| direction_of_arrival(e, base.sensor_spacing).angle_degrees)
        .collect();
    let count = estimates.len().max(1) as f32;

    ItemOut {
        file: path.to_string(),
        blocks: Some(estimates.len()),
        median_tau_ms: percentile(taus, 0.5),
        median_angle_degrees: percentile(angles, 0.5),
        mean_confidence: Some(estimates.iter().map(|e| e.confidence).sum::<f32>() / count),
        reliable_fraction: Some(estimates.iter().filter(|e| e.is_reliable()).count() as f32 / count),
        processing_time_ms: Some(t0.elapsed().as_secs_f32() * 1000.0),
        error: None,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut config = EstimatorConfig::default();
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let v = args
                    .first()
                    .ok_or("--jobs requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, v));
            }
            "--spacing" => {
                config.sensor_spacing = args.first().ok_or("--spacing requires a value")?.parse()?;
                args.remove(0);
            }
            "--block-size" => {
                config.block_size = args.first().ok_or("--block-size requires a value")?.parse()?;
                args.remove(0);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: analyze_batch [--jobs N] [--json] [--spacing M] [--block-size N] <file1> <file2> ...\n\
                     \n\
                     --jobs N         Parallel workers (default: CPU-1)\n\
                     --json           Emit one JSON object per line (JSONL)\n\
                     --spacing M      Microphone spacing in meters (default: 1.0)\n\
                     --block-size N   Analysis block size, power of two (default: 4096)\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one audio file path. Use --help for usage.");
        std::process::exit(2);
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} files, jobs={}", paths.len(), jobs);

    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .expect("Failed to build rayon thread pool");

    let outs: Vec<ItemOut> = pool.install(|| paths.par_iter().map(|path| analyze(path, &config)).collect());

    for (idx, o) in outs.iter().enumerate() {
        if json {
            println!("{}", serde_json::to_string(o)?);
        } else if let Some(error) = &o.error {
            println!("[{}/{}] {}: ERROR: {}", idx + 1, outs.len(), o.file, error);
        } else {
            println!(
                "[{}/{}] {}: blocks={} tau={:+.4}ms angle={:+.1}° conf={:.3} reliable={:.0}% time={:.2}ms",
                idx + 1,
                outs.len(),
                o.file,
                o.blocks.unwrap_or(0),
                o.median_tau_ms.unwrap_or(0.0),
                o.median_angle_degrees.unwrap_or(0.0),
                o.mean_confidence.unwrap_or(0.0),
                o.reliable_fraction.unwrap_or(0.0) * 100.0,
                o.processing_time_ms.unwrap_or(0.0)
            );
        }
    }

    let ok_times: Vec<f32> = outs.iter().filter_map(|o| o.processing_time_ms).collect();
    eprintln!(
        "Done: ok={}/{} wall={:.0}ms",
        ok_times.len(),
        outs.len(),
        t0.elapsed().as_secs_f64() * 1000.0
    );
    if !ok_times.is_empty() {
        let mean = ok_times.iter().sum::<f32>() / ok_times.len() as f32;
        let p50 = percentile(ok_times.clone(), 0.50).unwrap_or(mean);
        let p90 = percentile(ok_times.clone(), 0.90).unwrap_or(mean);
        eprintln!("processing_time_ms: mean={:.2} p50={:.2} p90={:.2}", mean, p50, p90);
    }

    Ok(())
}
