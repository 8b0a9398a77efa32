//! Radix-2 transform engine
//!
//! In-place complex FFT over split real/imaginary buffers. The block size is
//! fixed when the engine is built, so the bit-reversal permutation is computed
//! once and every transform runs without allocating.
//!
//! # Algorithm
//!
//! 1. Bit-reversal permutation of both arrays
//! 2. Iterative decimation-in-time butterflies, stage lengths 2, 4, ..., N
//! 3. Twiddle factors advance by complex multiplication (recurrence) within a
//!    stage instead of one `sin`/`cos` pair per butterfly
//!
//! The inverse reuses the forward pass: conjugate, transform, conjugate and
//! scale by `1/N`.

use std::f64::consts::PI;

use crate::error::TdoaError;

/// Split-format complex spectrum
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Real parts
    pub re: Vec<f32>,
    /// Imaginary parts
    pub im: Vec<f32>,
}

impl Spectrum {
    /// All-zero spectrum of `len` bins
    pub fn zeros(len: usize) -> Self {
        Self {
            re: vec![0.0; len],
            im: vec![0.0; len],
        }
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.re.len()
    }

    /// Whether the spectrum has no bins
    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }

    /// Load a real signal: copies `samples` into the real parts and clears the
    /// imaginary parts
    pub fn load_real(&mut self, samples: &[f32]) {
        debug_assert_eq!(samples.len(), self.re.len());
        self.re.copy_from_slice(samples);
        self.im.iter_mut().for_each(|x| *x = 0.0);
    }
}

/// Fixed-size radix-2 FFT
#[derive(Debug, Clone)]
pub struct Radix2Fft {
    size: usize,
    bit_reverse: Vec<usize>,
}

impl Radix2Fft {
    /// Plan a transform of `size` points
    ///
    /// # Errors
    ///
    /// Returns `TdoaError::InvalidConfig` if `size` is zero or not a power of two.
    pub fn new(size: usize) -> Result<Self, TdoaError> {
        if size == 0 || !size.is_power_of_two() {
            return Err(TdoaError::InvalidConfig(format!(
                "FFT size must be a power of two, got {}",
                size
            )));
        }

        let bits = size.trailing_zeros();
        let bit_reverse = (0..size).map(|i| reverse_bits(i, bits)).collect();

        Ok(Self { size, bit_reverse })
    }

    /// Transform length
    pub fn size(&self) -> usize {
        self.size
    }

    /// In-place forward transform
    pub fn forward(&self, re: &mut [f32], im: &mut [f32]) {
        let n = self.size;
        assert!(
            re.len() == n && im.len() == n,
            "FFT buffers must hold {} points (got {} / {})",
            n,
            re.len(),
            im.len()
        );

        for (i, &j) in self.bit_reverse.iter().enumerate() {
            if j > i {
                re.swap(i, j);
                im.swap(i, j);
            }
        }

        let mut len = 2;
        while len <= n {
            let half = len / 2;
            let theta = -2.0 * PI / len as f64;
            let (step_re, step_im) = (theta.cos(), theta.sin());

            for start in (0..n).step_by(len) {
                // Recurrence runs in f64; a 4096-point stage takes 2048 steps
                let mut w_re = 1.0f64;
                let mut w_im = 0.0f64;

                for j in 0..half {
                    let a = start + j;
                    let b = a + half;
                    let (wr, wi) = (w_re as f32, w_im as f32);

                    let t_re = re[b] * wr - im[b] * wi;
                    let t_im = re[b] * wi + im[b] * wr;

                    re[b] = re[a] - t_re;
                    im[b] = im[a] - t_im;
                    re[a] += t_re;
                    im[a] += t_im;

                    let next_re = w_re * step_re - w_im * step_im;
                    w_im = w_re * step_im + w_im * step_re;
                    w_re = next_re;
                }
            }

            len <<= 1;
        }
    }

    /// In-place inverse transform, scaled by `1/N`
    pub fn inverse(&self, re: &mut [f32], im: &mut [f32]) {
        im.iter_mut().for_each(|x| *x = -*x);

        self.forward(re, im);

        let scale = 1.0 / self.size as f32;
        for x in re.iter_mut() {
            *x *= scale;
        }
        for x in im.iter_mut() {
            *x = -*x * scale;
        }
    }

    /// Forward transform of a `Spectrum`
    pub fn forward_spectrum(&self, spectrum: &mut Spectrum) {
        self.forward(&mut spectrum.re, &mut spectrum.im);
    }

    /// Inverse transform of a `Spectrum`
    pub fn inverse_spectrum(&self, spectrum: &mut Spectrum) {
        self.inverse(&mut spectrum.re, &mut spectrum.im);
    }
}

fn reverse_bits(mut value: usize, bits: u32) -> usize {
    let mut result = 0;
    for _ in 0..bits {
        result = (result << 1) | (value & 1);
        value >>= 1;
    }
    result
}
