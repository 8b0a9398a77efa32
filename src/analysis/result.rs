//! Estimation result types

use serde::{Deserialize, Serialize};

/// Confidence at or above which an estimate is considered reliable
pub const RELIABLE_CONFIDENCE: f32 = 0.7;

/// Confidence below which an estimate should be treated as "no estimate"
pub const UNRELIABLE_CONFIDENCE: f32 = 0.5;

/// One delay estimate, emitted per completed block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayEstimate {
    /// Time difference of arrival in seconds
    ///
    /// Positive when the left channel lags the right one, i.e. the sound
    /// reached the right sensor first.
    pub tau: f32,

    /// Heuristic peak distinctness in [0, 1] (see `analysis::confidence`)
    pub confidence: f32,
}

impl DelayEstimate {
    /// Delay in milliseconds
    pub fn tau_ms(&self) -> f32 {
        self.tau * 1000.0
    }

    /// Delay in (fractional) samples at `sample_rate`
    pub fn tau_samples(&self, sample_rate: u32) -> f32 {
        self.tau * sample_rate as f32
    }

    /// Check if confidence is high (>= 0.7)
    pub fn is_reliable(&self) -> bool {
        self.confidence >= RELIABLE_CONFIDENCE
    }

    /// Get a human-readable confidence level: "High", "Medium" or "Low"
    pub fn confidence_level(&self) -> &'static str {
        if self.confidence >= RELIABLE_CONFIDENCE {
            "High"
        } else if self.confidence < UNRELIABLE_CONFIDENCE {
            "Low"
        } else {
            "Medium"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversions() {
        let estimate = DelayEstimate {
            tau: 0.0005,
            confidence: 0.9,
        };
        assert!((estimate.tau_ms() - 0.5).abs() < 1e-6);
        assert!((estimate.tau_samples(48000) - 24.0).abs() < 1e-3);
    }

    #[test]
    fn test_confidence_levels() {
        let level = |confidence| DelayEstimate { tau: 0.0, confidence }.confidence_level();
        assert_eq!(level(0.95), "High");
        assert_eq!(level(0.7), "High");
        assert_eq!(level(0.6), "Medium");
        assert_eq!(level(0.1), "Low");
        assert!(!DelayEstimate { tau: 0.0, confidence: 0.3 }.is_reliable());
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let estimate = DelayEstimate {
            tau: -0.25,
            confidence: 0.5,
        };
        let json = serde_json::to_string(&estimate).unwrap();
        assert_eq!(json, r#"{"tau":-0.25,"confidence":0.5}"#);
    }
}
