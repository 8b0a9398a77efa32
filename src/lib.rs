//! # TDOA DSP
//!
//! Streaming time-difference-of-arrival estimation for a two-microphone
//! array, using the generalized cross-correlation with phase transform
//! (GCC-PHAT).
//!
//! ## Features
//!
//! - **Streaming**: samples are pushed one pair at a time; an estimate is
//!   emitted every `block_size` samples
//! - **Sub-sample delays**: parabolic interpolation around the correlation peak
//! - **Physical bounds**: the lag search is limited by the sensor spacing,
//!   which can be changed at runtime from another thread
//! - **Confidence**: a peak-prominence score in `[0, 1]`
//!
//! ## Quick Start
//!
//! ```no_run
//! use tdoa_dsp::{EstimatorConfig, GccPhatEstimator};
//!
//! // Two synchronized channels at 48 kHz, 30 cm apart
//! let left: Vec<f32> = vec![]; // Your audio data
//! let right: Vec<f32> = vec![];
//!
//! let config = EstimatorConfig {
//!     sensor_spacing: 0.3,
//!     ..Default::default()
//! };
//! let mut estimator = GccPhatEstimator::new(config)?;
//!
//! for estimate in estimator.process_frame(&left, &right)? {
//!     println!("tau: {:.3} ms (confidence: {:.2})", estimate.tau_ms(), estimate.confidence);
//! }
//! # Ok::<(), tdoa_dsp::TdoaError>(())
//! ```
//!
//! ## Architecture
//!
//! Each completed block flows through:
//!
//! ```text
//! Ring Buffer → Hann Window → FFT → PHAT Cross-Spectrum → IFFT → Peak Search → Confidence → Output
//! ```
//!
//! A positive `tau` means the sound reached the right microphone first
//! (the left channel lags the right).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod dsp;
pub mod error;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use analysis::direction::{direction_of_arrival, DirectionEstimate};
pub use analysis::estimator::{EstimatorState, GccPhatEstimator};
pub use analysis::metadata::ProcessingStats;
pub use analysis::result::DelayEstimate;
pub use config::{EstimatorConfig, SpacingHandle, SPEED_OF_SOUND};
pub use error::TdoaError;
pub use io::decoder::{decode_stereo, DecodedStereo};
pub use io::frame_source::{BufferedSource, FrameSource, StereoFrame};
pub use io::handoff::{frame_queue, FrameConsumer, FrameProducer};

/// Estimate delays over a whole recording
///
/// Splits the two channels into consecutive, non-overlapping blocks of
/// `config.block_size` samples and returns one estimate per complete block.
/// Trailing samples that do not fill a block are ignored.
///
/// # Arguments
///
/// * `left` - Left channel samples
/// * `right` - Right channel samples, same length as `left`
/// * `config` - Estimator configuration
///
/// # Errors
///
/// Returns `TdoaError` if the configuration is invalid, the channels are empty,
/// or their lengths differ.
///
/// # Example
///
/// ```no_run
/// use tdoa_dsp::{estimate_delays, EstimatorConfig};
///
/// let left = vec![0.0f32; 48000]; // 1 second of silence
/// let right = vec![0.0f32; 48000];
/// let estimates = estimate_delays(&left, &right, EstimatorConfig::default())?;
/// assert_eq!(estimates.len(), 11);
/// # Ok::<(), tdoa_dsp::TdoaError>(())
/// ```
pub fn estimate_delays(
    left: &[f32],
    right: &[f32],
    config: EstimatorConfig,
) -> Result<Vec<DelayEstimate>, TdoaError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!(
        "Starting delay estimation: {} samples at {} Hz",
        left.len(),
        config.sample_rate
    );

    if left.is_empty() || right.is_empty() {
        return Err(TdoaError::InvalidInput("Empty audio samples".to_string()));
    }

    if left.len() != right.len() {
        return Err(TdoaError::InvalidInput(format!(
            "Channel length mismatch: left={}, right={}",
            left.len(),
            right.len()
        )));
    }

    let mut estimator = GccPhatEstimator::new(config)?;
    let estimates = estimator.process_frame(left, right)?;

    log::debug!(
        "Produced {} estimates in {:.2} ms",
        estimates.len(),
        start_time.elapsed().as_secs_f32() * 1000.0
    );

    Ok(estimates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_delays_block_count() {
        let config = EstimatorConfig {
            block_size: 512,
            ..Default::default()
        };
        let estimates = estimate_delays(&[0.0; 1600], &[0.0; 1600], config).unwrap();
        assert_eq!(estimates.len(), 3);
    }

    #[test]
    fn test_estimate_delays_rejects_bad_input() {
        let config = EstimatorConfig::default();
        assert!(estimate_delays(&[], &[], config.clone()).is_err());
        assert!(estimate_delays(&[0.0; 8], &[0.0; 9], config).is_err());
    }
}
