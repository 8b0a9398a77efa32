//! Two-channel circular sample history
//!
//! Holds the N most recent samples of each channel. Writing is O(1) and never
//! fails; the caller learns that a full block is available when the write
//! cursor wraps back to zero, i.e. once every N pushes.

/// Fixed-capacity stereo ring buffer
#[derive(Debug, Clone)]
pub struct StereoRingBuffer {
    left: Vec<f32>,
    right: Vec<f32>,
    /// Next write position; also the oldest sample once the buffer has filled
    cursor: usize,
}

impl StereoRingBuffer {
    /// Create a zero-filled buffer holding `capacity` samples per channel
    pub fn new(capacity: usize) -> Self {
        Self {
            left: vec![0.0; capacity],
            right: vec![0.0; capacity],
            cursor: 0,
        }
    }

    /// Samples held per channel
    pub fn capacity(&self) -> usize {
        self.left.len()
    }

    /// Current write position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Store one sample pair
    ///
    /// Returns `true` when this push completed a block (cursor wrapped to 0).
    pub fn push(&mut self, left: f32, right: f32) -> bool {
        self.left[self.cursor] = left;
        self.right[self.cursor] = right;
        self.cursor += 1;
        if self.cursor == self.left.len() {
            self.cursor = 0;
        }
        self.cursor == 0
    }

    /// Copy the history into `left_out` / `right_out`, oldest sample first
    pub fn linearize_into(&self, left_out: &mut [f32], right_out: &mut [f32]) {
        let n = self.left.len();
        debug_assert_eq!(left_out.len(), n);
        debug_assert_eq!(right_out.len(), n);

        let head = n - self.cursor;
        left_out[..head].copy_from_slice(&self.left[self.cursor..]);
        left_out[head..].copy_from_slice(&self.left[..self.cursor]);
        right_out[..head].copy_from_slice(&self.right[self.cursor..]);
        right_out[head..].copy_from_slice(&self.right[..self.cursor]);
    }

    /// Zero the history and rewind the cursor
    pub fn clear(&mut self) {
        self.left.iter_mut().for_each(|x| *x = 0.0);
        self.right.iter_mut().for_each(|x| *x = 0.0);
        self.cursor = 0;
    }
}
