//! Correlation peak location with sub-sample refinement
//!
//! The search is restricted to lags a real source can produce given the
//! sensor spacing. The integer winner is then refined by fitting a parabola
//! through it and its two neighbours.
//!
//! # Lag layout
//!
//! For a correlation sequence of length N:
//! - index 0: zero lag
//! - indices 1..=N/2: positive lags
//! - indices N/2+1..N: negative lags (`index - N`)

/// Parabola denominators at or below this magnitude skip refinement
pub const INTERPOLATION_EPSILON: f32 = 1e-12;

/// Physically valid lag indices of a circular correlation sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LagWindow {
    block_size: usize,
    max_lag: usize,
}

impl LagWindow {
    /// Window of `±max_lag` around zero lag; `max_lag` is clamped to `N/2`
    pub fn new(block_size: usize, max_lag: usize) -> Self {
        Self {
            block_size,
            max_lag: max_lag.min(block_size / 2),
        }
    }

    /// Largest lag magnitude searched, in samples
    pub fn max_lag(&self) -> usize {
        self.max_lag
    }

    /// Correlation length this window indexes into
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Indices in search order: `0..=max_lag`, then `N-max_lag..N`
    ///
    /// When `max_lag == N/2` the two ranges meet at `N/2`, which is yielded once.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        let n = self.block_size;
        let negative_start = (n - self.max_lag).max(self.max_lag + 1);
        (0..=self.max_lag).chain(negative_start..n)
    }
}

/// Winning correlation lag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Integer index of the maximum within the lag window
    pub index: usize,
    /// Correlation value at `index`
    pub value: f32,
    /// `index` plus the parabolic offset, if one was applied
    pub refined_index: f32,
}

impl Peak {
    /// Signed lag in samples, unwrapping indices past `N/2` to negative lags
    pub fn lag_samples(&self, block_size: usize) -> f32 {
        unwrap_lag(self.refined_index, block_size)
    }

    /// Signed delay in seconds
    pub fn tau_seconds(&self, block_size: usize, sample_rate: u32) -> f32 {
        self.lag_samples(block_size) / sample_rate as f32
    }
}

/// Find the largest correlation value inside `window` and refine its position
///
/// Ties keep the first index in search order. The index is refined only when
/// it has both neighbours (not 0, not N−1).
pub fn locate_peak(correlation: &[f32], window: &LagWindow) -> Peak {
    debug_assert_eq!(correlation.len(), window.block_size());

    let mut index = 0;
    let mut value = correlation[0];
    for i in window.indices() {
        if correlation[i] > value {
            value = correlation[i];
            index = i;
        }
    }

    let n = correlation.len();
    let mut refined_index = index as f32;
    if index > 0 && index < n - 1 {
        let offset = parabolic_offset(
            correlation[index - 1],
            correlation[index],
            correlation[index + 1],
        );
        if let Some(delta) = offset {
            refined_index += delta;
        }
    }

    log::trace!(
        "Peak at index {} (value {:.4}), refined to {:.3}",
        index,
        value,
        refined_index
    );

    Peak {
        index,
        value,
        refined_index,
    }
}

/// Vertex offset of the parabola through `(-1, y1)`, `(0, y2)`, `(1, y3)`
///
/// Returns `None` when the three points are (nearly) collinear.
pub fn parabolic_offset(y1: f32, y2: f32, y3: f32) -> Option<f32> {
    let denom = y1 - 2.0 * y2 + y3;
    if denom.abs() > INTERPOLATION_EPSILON {
        Some(0.5 * (y1 - y3) / denom)
    } else {
        None
    }
}

/// Map a (possibly fractional) circular index to a signed lag
pub fn unwrap_lag(index: f32, block_size: usize) -> f32 {
    if index <= (block_size / 2) as f32 {
        index
    } else {
        index - block_size as f32
    }
}
