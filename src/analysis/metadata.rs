//! Estimator processing statistics

use serde::{Deserialize, Serialize};

/// Running counters kept by the estimator
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Sample pairs pushed since construction or the last reset
    pub samples_pushed: u64,

    /// Completed block passes
    pub blocks_processed: u64,

    /// Block passes that took longer than the frame that triggered them
    pub deadline_misses: u64,

    /// Wall-clock duration of the most recent block pass (microseconds)
    pub last_block_micros: u64,
}

impl ProcessingStats {
    /// Fraction of block passes that missed their deadline
    pub fn deadline_miss_ratio(&self) -> f32 {
        if self.blocks_processed == 0 {
            0.0
        } else {
            self.deadline_misses as f32 / self.blocks_processed as f32
        }
    }
}
