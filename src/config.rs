//! Configuration parameters for TDOA estimation

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::TdoaError;

/// Speed of sound in air at room temperature (m/s)
pub const SPEED_OF_SOUND: f32 = 343.0;

/// Smallest block size the estimator accepts
pub const MIN_BLOCK_SIZE: usize = 2;

/// Estimator configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Analysis block size in samples (default: 4096)
    /// Must be a power of two; fixed for the lifetime of an estimator
    pub block_size: usize,

    /// Sample rate in Hz (default: 48000)
    pub sample_rate: u32,

    /// Distance between the two microphones in meters (default: 1.0)
    /// Bounds the lag search window; may be changed at runtime
    pub sensor_spacing: f32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            block_size: 4096,
            sample_rate: 48000,
            sensor_spacing: 1.0,
        }
    }
}

impl EstimatorConfig {
    /// Check every field, returning the first violation found
    pub fn validate(&self) -> Result<(), TdoaError> {
        if self.block_size < MIN_BLOCK_SIZE || !self.block_size.is_power_of_two() {
            return Err(TdoaError::InvalidConfig(format!(
                "Block size must be a power of two >= {}, got {}",
                MIN_BLOCK_SIZE, self.block_size
            )));
        }

        if self.sample_rate == 0 {
            return Err(TdoaError::InvalidConfig("Invalid sample rate: 0".to_string()));
        }

        validate_spacing(self.sensor_spacing)
    }

    /// Largest physically meaningful lag in samples for the configured spacing,
    /// clamped to half the block size
    pub fn max_lag_samples(&self) -> usize {
        max_lag_samples(self.sensor_spacing, self.sample_rate, self.block_size)
    }

    /// Largest delay magnitude in seconds the estimator can emit
    pub fn max_tau_seconds(&self) -> f32 {
        max_tau_seconds(self.sensor_spacing, self.sample_rate, self.block_size)
    }

    /// Duration of one analysis block in seconds
    pub fn block_duration_seconds(&self) -> f32 {
        self.block_size as f32 / self.sample_rate as f32
    }
}

/// Reject negative, NaN and infinite spacings
pub fn validate_spacing(spacing: f32) -> Result<(), TdoaError> {
    if !spacing.is_finite() || spacing < 0.0 {
        return Err(TdoaError::InvalidConfig(format!(
            "Sensor spacing must be a finite, non-negative distance in meters, got {}",
            spacing
        )));
    }
    Ok(())
}

/// `min(floor((d / c) * R), N / 2)`
pub fn max_lag_samples(spacing: f32, sample_rate: u32, block_size: usize) -> usize {
    let lag = (spacing as f64 / SPEED_OF_SOUND as f64) * sample_rate as f64;
    let half = block_size / 2;
    if !lag.is_finite() || lag <= 0.0 {
        return 0;
    }
    let lag = lag.floor();
    if lag >= half as f64 {
        half
    } else {
        lag as usize
    }
}

/// `min(d / c, (N / 2) / R)`
pub fn max_tau_seconds(spacing: f32, sample_rate: u32, block_size: usize) -> f32 {
    let physical = spacing / SPEED_OF_SOUND;
    let window = (block_size / 2) as f32 / sample_rate as f32;
    physical.min(window).max(0.0)
}

/// Shared, lock-free sensor spacing
///
/// Writers on any thread store a new spacing; the estimator loads it once at
/// the start of every block pass. A write racing a block in flight is picked
/// up by the next block.
#[derive(Debug, Clone)]
pub struct SpacingHandle {
    bits: Arc<AtomicU32>,
}

impl SpacingHandle {
    /// Create a handle holding `spacing` meters
    pub fn new(spacing: f32) -> Result<Self, TdoaError> {
        validate_spacing(spacing)?;
        Ok(Self {
            bits: Arc::new(AtomicU32::new(spacing.to_bits())),
        })
    }

    /// Store a new spacing in meters
    pub fn set(&self, spacing: f32) -> Result<(), TdoaError> {
        validate_spacing(spacing)?;
        self.bits.store(spacing.to_bits(), Ordering::Release);
        Ok(())
    }

    /// Current spacing in meters
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EstimatorConfig::default();
        assert!(config.validate().is_ok());
        // 1 m at 48 kHz: floor(139.94)
        assert_eq!(config.max_lag_samples(), 139);
    }

    #[test]
    fn test_rejects_non_power_of_two_block() {
        let config = EstimatorConfig {
            block_size: 1000,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TdoaError::InvalidConfig(_))));

        let config = EstimatorConfig {
            block_size: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_sample_rate_and_spacing() {
        let config = EstimatorConfig {
            sample_rate: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        for spacing in [-0.1, f32::NAN, f32::INFINITY] {
            let config = EstimatorConfig {
                sensor_spacing: spacing,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "spacing {} should be rejected", spacing);
        }
    }

    #[test]
    fn test_max_lag_clamped_to_half_block() {
        let config = EstimatorConfig {
            block_size: 256,
            sample_rate: 48000,
            sensor_spacing: 10.0,
        };
        assert_eq!(config.max_lag_samples(), 128);
        assert!((config.max_tau_seconds() - 128.0 / 48000.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_lag_small_spacings() {
        // 0.1 m at 48 kHz: floor(13.99)
        assert_eq!(max_lag_samples(0.1, 48000, 4096), 13);
        assert_eq!(max_lag_samples(0.0, 48000, 4096), 0);
    }

    #[test]
    fn test_spacing_handle_shared_between_clones() {
        let handle = SpacingHandle::new(0.5).unwrap();
        let writer = handle.clone();
        writer.set(0.25).unwrap();
        assert_eq!(handle.get(), 0.25);
        assert!(writer.set(-1.0).is_err());
        assert_eq!(handle.get(), 0.25);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: EstimatorConfig = serde_json::from_str(r#"{"sensor_spacing": 0.2}"#).unwrap();
        assert_eq!(config.block_size, 4096);
        assert_eq!(config.sensor_spacing, 0.2);
    }
}
