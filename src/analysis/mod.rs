//! Estimation and result modules
//!
//! Turns correlation sequences into reported delays:
//! - Block orchestration (`estimator`)
//! - Confidence scoring
//! - Result types and direction of arrival
//! - Processing counters

pub mod confidence;
pub mod direction;
pub mod estimator;
pub mod metadata;
pub mod result;
