//! GCC-PHAT delay estimator
//!
//! Drives the full pipeline once per completed block:
//!
//! ```text
//! push ──► ring buffer ──(wrap)──► window ──► FFT ×2 ──► PHAT cross-spectrum
//!                                                              │
//!        DelayEstimate ◄── confidence ◄── peak locator ◄── inverse FFT
//! ```
//!
//! # Example
//!
//! ```
//! use tdoa_dsp::{EstimatorConfig, GccPhatEstimator};
//!
//! let config = EstimatorConfig {
//!     block_size: 1024,
//!     ..Default::default()
//! };
//! let mut estimator = GccPhatEstimator::new(config)?;
//!
//! let left = vec![0.0f32; 2048];
//! let right = vec![0.0f32; 2048];
//! let estimates = estimator.process_frame(&left, &right)?;
//! assert_eq!(estimates.len(), 2);
//! # Ok::<(), tdoa_dsp::TdoaError>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::confidence::score_peak;
use super::metadata::ProcessingStats;
use super::result::DelayEstimate;
use crate::config::{max_lag_samples, max_tau_seconds, EstimatorConfig, SpacingHandle};
use crate::dsp::cross_spectrum::phat_cross_spectrum;
use crate::dsp::fft::{Radix2Fft, Spectrum};
use crate::dsp::peak::{locate_peak, LagWindow, Peak};
use crate::dsp::window::WindowTable;
use crate::error::TdoaError;
use crate::io::frame_source::FrameSource;
use crate::io::ring_buffer::StereoRingBuffer;

/// Estimator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorState {
    /// Collecting samples until the ring buffer wraps
    Accumulating,
    /// A block pass is running (only observable from inside the pipeline)
    BlockReady,
}

/// Scratch buffers for one block pass
///
/// Everything the pipeline writes lives here, so stages take it by reference
/// and nothing is allocated per block.
#[derive(Debug, Clone)]
pub struct BlockWorkspace {
    left: Spectrum,
    right: Spectrum,
    /// Whitened cross-spectrum; holds the correlation sequence in `re` after
    /// the inverse transform
    cross: Spectrum,
}

impl BlockWorkspace {
    /// Allocate buffers for blocks of `block_size` samples
    pub fn new(block_size: usize) -> Self {
        Self {
            left: Spectrum::zeros(block_size),
            right: Spectrum::zeros(block_size),
            cross: Spectrum::zeros(block_size),
        }
    }

    /// Copy the ring buffer contents, oldest first, into the channel spectra
    pub fn load(&mut self, buffer: &StereoRingBuffer) {
        buffer.linearize_into(&mut self.left.re, &mut self.right.re);
        self.left.im.iter_mut().for_each(|x| *x = 0.0);
        self.right.im.iter_mut().for_each(|x| *x = 0.0);
    }

    /// Load two channel blocks directly
    pub fn load_blocks(&mut self, left: &[f32], right: &[f32]) {
        self.left.load_real(left);
        self.right.load_real(right);
    }

    /// Window, transform, whiten and invert the loaded blocks
    ///
    /// Returns the circular cross-correlation sequence.
    pub fn correlate(&mut self, fft: &Radix2Fft, window: &WindowTable) -> &[f32] {
        window.apply(&mut self.left.re);
        window.apply(&mut self.right.re);

        fft.forward_spectrum(&mut self.left);
        fft.forward_spectrum(&mut self.right);

        phat_cross_spectrum(&self.left, &self.right, &mut self.cross);
        fft.inverse_spectrum(&mut self.cross);

        &self.cross.re
    }

    /// Correlation sequence from the most recent `correlate` call
    pub fn correlation(&self) -> &[f32] {
        &self.cross.re
    }
}

/// Locate and score the peak of `correlation`, returning the bounded estimate
pub fn estimate_from_correlation(
    correlation: &[f32],
    spacing: f32,
    sample_rate: u32,
) -> (Peak, DelayEstimate) {
    let n = correlation.len();
    let lags = LagWindow::new(n, max_lag_samples(spacing, sample_rate, n));

    let peak = locate_peak(correlation, &lags);
    let confidence = score_peak(correlation, &lags, &peak);

    // Interpolation can overshoot the last searched lag by up to a sample
    let max_tau = max_tau_seconds(spacing, sample_rate, n);
    let tau = peak.tau_seconds(n, sample_rate).clamp(-max_tau, max_tau);

    (peak, DelayEstimate { tau, confidence })
}

/// Streaming GCC-PHAT time-difference-of-arrival estimator
#[derive(Debug)]
pub struct GccPhatEstimator {
    config: EstimatorConfig,
    spacing: SpacingHandle,
    window: Arc<WindowTable>,
    fft: Radix2Fft,
    buffer: StereoRingBuffer,
    workspace: BlockWorkspace,
    state: EstimatorState,
    stats: ProcessingStats,
    /// Wall-clock budget for one block pass, set while a frame is processed
    frame_budget: Option<Duration>,
}

impl GccPhatEstimator {
    /// Create an estimator with its own window table
    ///
    /// # Errors
    ///
    /// Returns `TdoaError::InvalidConfig` if the block size is not a power of
    /// two, the sample rate is zero or the spacing is invalid.
    pub fn new(config: EstimatorConfig) -> Result<Self, TdoaError> {
        config.validate()?;
        let window = Arc::new(WindowTable::hann(config.block_size));
        Self::with_window(config, window)
    }

    /// Create an estimator sharing an existing window table
    pub fn with_window(config: EstimatorConfig, window: Arc<WindowTable>) -> Result<Self, TdoaError> {
        config.validate()?;
        if window.len() != config.block_size {
            return Err(TdoaError::InvalidConfig(format!(
                "Window length {} does not match block size {}",
                window.len(),
                config.block_size
            )));
        }

        let fft = Radix2Fft::new(config.block_size)?;
        let spacing = SpacingHandle::new(config.sensor_spacing)?;

        log::debug!(
            "GCC-PHAT estimator: N={}, R={} Hz, d={:.3} m, max lag={} samples",
            config.block_size,
            config.sample_rate,
            config.sensor_spacing,
            config.max_lag_samples()
        );

        Ok(Self {
            buffer: StereoRingBuffer::new(config.block_size),
            workspace: BlockWorkspace::new(config.block_size),
            config,
            spacing,
            window,
            fft,
            state: EstimatorState::Accumulating,
            stats: ProcessingStats::default(),
            frame_budget: None,
        })
    }

    /// Feed one sample pair
    ///
    /// Returns an estimate when this sample completed a block, i.e. on every
    /// N-th call.
    pub fn push(&mut self, left: f32, right: f32) -> Option<DelayEstimate> {
        self.stats.samples_pushed += 1;
        if self.buffer.push(left, right) {
            Some(self.process_block())
        } else {
            None
        }
    }

    /// Feed one frame, returning every estimate it completed
    ///
    /// Each block pass is expected to finish within the frame's duration;
    /// overruns are counted in `stats().deadline_misses`.
    pub fn process_frame(&mut self, left: &[f32], right: &[f32]) -> Result<Vec<DelayEstimate>, TdoaError> {
        let mut estimates = Vec::new();
        self.process_frame_into(left, right, &mut estimates)?;
        Ok(estimates)
    }

    /// Like `process_frame`, appending into a caller-owned vector
    pub fn process_frame_into(
        &mut self,
        left: &[f32],
        right: &[f32],
        out: &mut Vec<DelayEstimate>,
    ) -> Result<(), TdoaError> {
        if left.len() != right.len() {
            return Err(TdoaError::InvalidInput(format!(
                "Channel length mismatch: left={}, right={}",
                left.len(),
                right.len()
            )));
        }

        self.frame_budget = Some(Duration::from_secs_f64(
            left.len() as f64 / self.config.sample_rate as f64,
        ));
        for (&l, &r) in left.iter().zip(right) {
            if let Some(estimate) = self.push(l, r) {
                out.push(estimate);
            }
        }
        self.frame_budget = None;

        Ok(())
    }

    /// Pull frames from `source` until it is exhausted, handing every
    /// estimate to `sink`
    ///
    /// Returns the number of estimates emitted.
    pub fn run<S, F>(&mut self, source: &mut S, mut sink: F) -> Result<u64, TdoaError>
    where
        S: FrameSource + ?Sized,
        F: FnMut(DelayEstimate),
    {
        if source.sample_rate() != self.config.sample_rate {
            return Err(TdoaError::InvalidInput(format!(
                "Source sample rate {} Hz does not match estimator rate {} Hz",
                source.sample_rate(),
                self.config.sample_rate
            )));
        }

        let mut emitted = 0u64;
        let mut estimates = Vec::new();
        while let Some(frame) = source.next_frame()? {
            estimates.clear();
            self.process_frame_into(&frame.left, &frame.right, &mut estimates)?;
            for estimate in estimates.drain(..) {
                sink(estimate);
                emitted += 1;
            }
        }

        log::debug!(
            "Source exhausted after {} samples, {} estimates",
            self.stats.samples_pushed,
            emitted
        );
        Ok(emitted)
    }

    /// Change the sensor spacing; takes effect at the next block pass
    pub fn set_sensor_spacing(&mut self, spacing: f32) -> Result<(), TdoaError> {
        self.spacing.set(spacing)
    }

    /// Current sensor spacing in meters
    pub fn sensor_spacing(&self) -> f32 {
        self.spacing.get()
    }

    /// Handle for updating the spacing from another thread
    pub fn spacing_handle(&self) -> SpacingHandle {
        self.spacing.clone()
    }

    /// Configuration with the current sensor spacing
    pub fn config(&self) -> EstimatorConfig {
        EstimatorConfig {
            sensor_spacing: self.spacing.get(),
            ..self.config.clone()
        }
    }

    /// Current state
    pub fn state(&self) -> EstimatorState {
        self.state
    }

    /// Processing counters
    pub fn stats(&self) -> ProcessingStats {
        self.stats
    }

    /// Shared window table
    pub fn window(&self) -> &Arc<WindowTable> {
        &self.window
    }

    /// Correlation sequence of the most recent block
    pub fn last_correlation(&self) -> &[f32] {
        self.workspace.correlation()
    }

    /// Discard buffered samples and counters; spacing is kept
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.stats = ProcessingStats::default();
        self.state = EstimatorState::Accumulating;
    }

    fn process_block(&mut self) -> DelayEstimate {
        let started = Instant::now();
        self.state = EstimatorState::BlockReady;

        // Read once: a concurrent update lands on the next block
        let spacing = self.spacing.get();

        self.workspace.load(&self.buffer);
        let correlation = self.workspace.correlate(&self.fft, &self.window);
        let (peak, estimate) = estimate_from_correlation(correlation, spacing, self.config.sample_rate);

        let elapsed = started.elapsed();
        self.stats.blocks_processed += 1;
        self.stats.last_block_micros = elapsed.as_micros() as u64;
        if let Some(budget) = self.frame_budget {
            if elapsed > budget {
                self.stats.deadline_misses += 1;
                log::warn!(
                    "Block {} took {:?}, frame budget is {:?}",
                    self.stats.blocks_processed,
                    elapsed,
                    budget
                );
            }
        }

        log::trace!(
            "Block {}: peak index {} -> tau={:.6}s confidence={:.3}",
            self.stats.blocks_processed,
            peak.index,
            estimate.tau,
            estimate.confidence
        );

        self.state = EstimatorState::Accumulating;
        estimate
    }
}
