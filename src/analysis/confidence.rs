//! Confidence scoring module
//!
//! Rates how clearly the correlation peak stands out from the rest of the
//! physically valid lag window.
//!
//! # Algorithm
//!
//! 1. Collect every correlation value in the lag window except the peak
//! 2. Compute their mean and population variance
//! 3. Floor the standard deviation at `sqrt(1e-12)`
//! 4. `z = (peak - mean) / std`
//! 5. `confidence = clamp(z / 10, 0, 1)`
//!
//! # Interpretation
//!
//! The score is an uncalibrated heuristic, **not** a probability. It rewards
//! peaks that rise sharply above the local correlation floor and saturates
//! once the peak sits ten standard deviations above it. Its exact shape is
//! kept stable so downstream thresholds keep working; treat low values as
//! "no reliable estimate" rather than as an error.
//!
//! # Example
//!
//! ```
//! use tdoa_dsp::analysis::confidence::score_peak;
//! use tdoa_dsp::dsp::peak::{locate_peak, LagWindow};
//!
//! let mut correlation = vec![0.01f32; 64];
//! correlation[3] = 1.0;
//! let window = LagWindow::new(64, 8);
//! let peak = locate_peak(&correlation, &window);
//! assert_eq!(score_peak(&correlation, &window, &peak), 1.0);
//! ```

use crate::dsp::peak::{LagWindow, Peak};

/// Floor applied to the background variance
pub const VARIANCE_FLOOR: f64 = 1e-12;

/// z-score at which confidence saturates to 1.0
pub const Z_SCORE_SATURATION: f64 = 10.0;

/// Score the distinctness of `peak` against the rest of `window`
///
/// Returns 0.0 when the window holds nothing but the peak (zero spacing) or
/// when the statistics are not finite.
pub fn score_peak(correlation: &[f32], window: &LagWindow, peak: &Peak) -> f32 {
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut count = 0usize;

    for i in window.indices().filter(|&i| i != peak.index) {
        let value = correlation[i] as f64;
        sum += value;
        sum_sq += value * value;
        count += 1;
    }

    if count == 0 {
        return 0.0;
    }

    let mean = sum / count as f64;
    let variance = sum_sq / count as f64 - mean * mean;
    let std = variance.max(VARIANCE_FLOOR).sqrt();
    let z_score = (peak.value as f64 - mean) / std;

    if !z_score.is_finite() {
        log::trace!("Non-finite z-score (peak {}, mean {})", peak.value, mean);
        return 0.0;
    }

    (z_score / Z_SCORE_SATURATION).clamp(0.0, 1.0) as f32
}
