//! Analysis window table
//!
//! Precomputed Hann coefficients applied to each block before the forward
//! transform to reduce spectral leakage from the block edges.

use std::f64::consts::PI;

/// Immutable Hann window of a fixed length
#[derive(Debug, Clone, PartialEq)]
pub struct WindowTable {
    coefficients: Vec<f32>,
}

impl WindowTable {
    /// Build the table `w[i] = 0.5 * (1 - cos(2πi / (N - 1)))`
    ///
    /// A length-1 table holds the single coefficient 1.0.
    pub fn hann(len: usize) -> Self {
        let coefficients = if len > 1 {
            let denom = (len - 1) as f64;
            (0..len)
                .map(|i| (0.5 * (1.0 - (2.0 * PI * i as f64 / denom).cos())) as f32)
                .collect()
        } else {
            vec![1.0; len]
        };

        Self { coefficients }
    }

    /// Number of coefficients
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Raw coefficients
    pub fn coefficients(&self) -> &[f32] {
        &self.coefficients
    }

    /// Multiply `block` element-wise by the window
    pub fn apply(&self, block: &mut [f32]) {
        debug_assert_eq!(block.len(), self.coefficients.len());
        for (sample, &w) in block.iter_mut().zip(&self.coefficients) {
            *sample *= w;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_endpoints_and_peak() {
        let window = WindowTable::hann(9);
        let w = window.coefficients();
        assert_eq!(w.len(), 9);
        assert!(w[0].abs() < 1e-7);
        assert!(w[8].abs() < 1e-7);
        assert!((w[4] - 1.0).abs() < 1e-7);
    }

    #[test]
    fn test_hann_is_symmetric() {
        let window = WindowTable::hann(64);
        let w = window.coefficients();
        for i in 0..32 {
            assert!((w[i] - w[63 - i]).abs() < 1e-6, "asymmetric at {}", i);
        }
    }

    #[test]
    fn test_single_coefficient_window() {
        let window = WindowTable::hann(1);
        assert_eq!(window.coefficients(), &[1.0]);
    }

    #[test]
    fn test_apply_scales_block() {
        let window = WindowTable::hann(4);
        let mut block = vec![2.0f32; 4];
        window.apply(&mut block);
        // N = 4: cos(2π/3) = -0.5 -> 0.75
        assert!(block[0].abs() < 1e-6);
        assert!((block[1] - 1.5).abs() < 1e-6);
        assert!((block[2] - 1.5).abs() < 1e-6);
        assert!(block[3].abs() < 1e-6);
    }
}
