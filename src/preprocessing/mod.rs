//! Audio preprocessing modules
//!
//! Utilities for preparing capture output for the estimator:
//! - Deinterleaving multichannel audio into a left/right pair
//! - Optional left/right swap

pub mod channel_mixer;
