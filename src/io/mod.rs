//! Audio I/O modules
//!
//! Sample history for the estimator, frame sources that feed it, the
//! cross-thread hand-off queue and file decoding via Symphonia.

pub mod decoder;
pub mod frame_source;
pub mod handoff;
pub mod ring_buffer;
