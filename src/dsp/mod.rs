//! Numeric building blocks of the GCC-PHAT pipeline
//!
//! - Hann window table
//! - In-place radix-2 FFT
//! - PHAT-weighted cross-spectrum
//! - Lag-window peak search with parabolic refinement

pub mod cross_spectrum;
pub mod fft;
pub mod peak;
pub mod window;
