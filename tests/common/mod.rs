//! Synthetic stereo signals with known delays

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// White noise pair where the left channel lags the right by `delay` samples
pub fn delayed_noise(len: usize, delay: usize, seed: u64) -> (Vec<f32>, Vec<f32>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let base: Vec<f32> = (0..len + delay).map(|_| rng.random_range(-1.0f32..1.0)).collect();
    (base[..len].to_vec(), base[delay..].to_vec())
}

/// Broadband multitone pair where the left channel lags the right by a
/// possibly fractional `delay` in samples
///
/// Tones are spaced 47 Hz apart from 60 Hz up to just below Nyquist, with
/// random phases, so the delay is exact rather than interpolated.
pub fn delayed_multitone(len: usize, sample_rate: u32, delay: f64, seed: u64) -> (Vec<f32>, Vec<f32>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let rate = sample_rate as f64;
    let nyquist = rate / 2.0;

    let tones: Vec<(f64, f64)> = (0..)
        .map(|k| 60.0 + 47.0 * k as f64)
        .take_while(|&f| f < nyquist - 100.0)
        .map(|f| (f, rng.random_range(0.0..std::f64::consts::TAU)))
        .collect();
    let amplitude = 1.0 / (tones.len() as f64).sqrt();

    let render = |shift: f64| -> Vec<f32> {
        (0..len)
            .map(|n| {
                let t = (n as f64 - shift) / rate;
                let sum: f64 = tones
                    .iter()
                    .map(|&(f, phase)| (std::f64::consts::TAU * f * t + phase).sin())
                    .sum();
                (sum * amplitude) as f32
            })
            .collect()
    };

    (render(delay), render(0.0))
}

/// Add independent uniform noise of peak `amplitude` to each channel
pub fn add_noise(left: &mut [f32], right: &mut [f32], amplitude: f32, seed: u64) {
    if amplitude == 0.0 {
        return;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    for x in left.iter_mut().chain(right.iter_mut()) {
        *x += rng.random_range(-amplitude..amplitude);
    }
}
