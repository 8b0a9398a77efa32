//! Direction-of-arrival conversion
//!
//! Turns a delay estimate into a far-field bearing for a two-sensor array:
//! `sin θ = c · τ / d`, with θ = 0° broadside and ±90° along the array axis.

use serde::{Deserialize, Serialize};

use super::result::DelayEstimate;
use crate::config::SPEED_OF_SOUND;

/// Fraction of the maximum delay beyond which an estimate counts as end-fire
pub const END_FIRE_FRACTION: f32 = 0.95;

/// Confidence multiplier applied to end-fire estimates
pub const END_FIRE_PENALTY: f32 = 0.3;

/// Bearing derived from a delay estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionEstimate {
    /// Bearing in degrees, -90..=90
    pub angle_degrees: f32,

    /// Delay the bearing was computed from (seconds, unclamped)
    pub tau: f32,

    /// Confidence after the end-fire penalty
    pub confidence: f32,
}

/// Convert `estimate` to a bearing for sensors `spacing` meters apart
///
/// - tau is clamped to `±d/c` before taking the arcsine
/// - estimates at or beyond 95% of `d/c` keep only 30% of their confidence,
///   since the arcsine is flat there and a saturated peak is the usual cause
/// - a non-positive spacing yields 0° with zero confidence
pub fn direction_of_arrival(estimate: &DelayEstimate, spacing: f32) -> DirectionEstimate {
    if spacing.is_nan() || spacing <= 0.0 {
        return DirectionEstimate {
            angle_degrees: 0.0,
            tau: estimate.tau,
            confidence: 0.0,
        };
    }

    let max_tau = spacing / SPEED_OF_SOUND;
    let clamped_tau = estimate.tau.clamp(-max_tau, max_tau);
    let sin_theta = (SPEED_OF_SOUND * clamped_tau / spacing).clamp(-1.0, 1.0);
    let angle_degrees = sin_theta.asin().to_degrees();

    let confidence = if estimate.tau.abs() >= max_tau * END_FIRE_FRACTION {
        estimate.confidence * END_FIRE_PENALTY
    } else {
        estimate.confidence
    };

    DirectionEstimate {
        angle_degrees,
        tau: estimate.tau,
        confidence,
    }
}
