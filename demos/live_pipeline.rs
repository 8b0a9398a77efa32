//! Example: Capture thread feeding a live estimator
//!
//! A producer thread stands in for an audio callback: it renders a moving
//! source in 10 ms frames and hands them over through a drop-oldest queue.
//! A control thread moves the microphones closer together halfway through.
//!
//! Usage:
//!   cargo run --release --example live_pipeline

use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tdoa_dsp::{direction_of_arrival, frame_queue, EstimatorConfig, GccPhatEstimator, StereoFrame};

const RATE: u32 = 48000;
const FRAME: usize = 480;
const SECONDS: usize = 4;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = EstimatorConfig {
        block_size: 2048,
        sample_rate: RATE,
        sensor_spacing: 0.5,
    };
    let mut estimator = GccPhatEstimator::new(config)?;
    let spacing = estimator.spacing_handle();
    let (producer, mut consumer) = frame_queue(8, RATE);

    let capture = thread::spawn(move || {
        let mut rng = StdRng::seed_from_u64(7);
        // History long enough for the largest delay
        let mut history = vec![0.0f32; 64];
        let total = RATE as usize * SECONDS;

        for start in (0..total).step_by(FRAME) {
            // Source sweeps from 20 samples right-lag to 20 samples left-lag
            let delay = (-20.0 + 40.0 * start as f32 / total as f32).round() as isize;
            let mut left = Vec::with_capacity(FRAME);
            let mut right = Vec::with_capacity(FRAME);
            for _ in 0..FRAME {
                history.rotate_left(1);
                let last = history.len() - 1;
                history[last] = rng.random_range(-1.0f32..1.0);
                let lagged = history[(last as isize - delay.abs()) as usize];
                if delay >= 0 {
                    left.push(lagged);
                    right.push(history[last]);
                } else {
                    left.push(history[last]);
                    right.push(lagged);
                }
            }

            let frame = StereoFrame::new(left, right).expect("Channels have equal length");
            if producer.push(frame).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        producer.dropped_frames()
    });

    let control = thread::spawn(move || {
        thread::sleep(Duration::from_secs(SECONDS as u64 / 2));
        log::info!("Moving microphones to 0.1 m");
        if let Err(e) = spacing.set(0.1) {
            eprintln!("Spacing update rejected: {e}");
        }
    });

    let handle = estimator.spacing_handle();
    estimator.run(&mut consumer, |estimate| {
        let current = handle.get();
        let direction = direction_of_arrival(&estimate, current);
        println!(
            "d={:.2} m  tau={:+7.3} ms  angle={:+6.1}°  confidence={:.2}",
            current,
            estimate.tau_ms(),
            direction.angle_degrees,
            direction.confidence
        );
    })?;

    control.join().map_err(|_| "control thread panicked")?;
    let dropped = capture.join().map_err(|_| "capture thread panicked")?;

    let stats = estimator.stats();
    println!(
        "blocks={} dropped_frames={} deadline_misses={} ({:.1}%)",
        stats.blocks_processed,
        dropped,
        stats.deadline_misses,
        stats.deadline_miss_ratio() * 100.0
    );

    Ok(())
}
