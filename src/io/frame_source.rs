//! Pull-based stereo frame sources
//!
//! Capture devices, file decoders and cross-thread queues all hand the
//! estimator audio the same way: the consumer asks for the next frame and
//! gets `None` once the stream has ended.

use crate::error::TdoaError;

/// One frame of synchronized two-channel audio
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoFrame {
    /// Left channel samples
    pub left: Vec<f32>,
    /// Right channel samples, same length as `left`
    pub right: Vec<f32>,
}

impl StereoFrame {
    /// Build a frame from two equal-length channels
    pub fn new(left: Vec<f32>, right: Vec<f32>) -> Result<Self, TdoaError> {
        if left.len() != right.len() {
            return Err(TdoaError::InvalidInput(format!(
                "Channel length mismatch: left={}, right={}",
                left.len(),
                right.len()
            )));
        }
        Ok(Self { left, right })
    }

    /// Samples per channel
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Whether the frame holds no samples
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Source of stereo frames at a fixed sample rate
pub trait FrameSource {
    /// Next frame, or `None` once the stream is exhausted
    fn next_frame(&mut self) -> Result<Option<StereoFrame>, TdoaError>;

    /// Sample rate of every frame this source yields
    fn sample_rate(&self) -> u32;
}

/// Serves fixed-size frames from in-memory channel buffers
///
/// The final frame may be shorter than `frame_size`.
#[derive(Debug, Clone)]
pub struct BufferedSource {
    left: Vec<f32>,
    right: Vec<f32>,
    sample_rate: u32,
    frame_size: usize,
    /// Current position
    position: usize,
}

impl BufferedSource {
    /// Wrap two equal-length channels
    pub fn new(
        left: Vec<f32>,
        right: Vec<f32>,
        sample_rate: u32,
        frame_size: usize,
    ) -> Result<Self, TdoaError> {
        if left.len() != right.len() {
            return Err(TdoaError::InvalidInput(format!(
                "Channel length mismatch: left={}, right={}",
                left.len(),
                right.len()
            )));
        }
        if frame_size == 0 {
            return Err(TdoaError::InvalidInput("Invalid frame size: 0".to_string()));
        }
        if sample_rate == 0 {
            return Err(TdoaError::InvalidInput("Invalid sample rate: 0".to_string()));
        }

        Ok(Self {
            left,
            right,
            sample_rate,
            frame_size,
            position: 0,
        })
    }

    /// Samples per channel not yet served
    pub fn remaining(&self) -> usize {
        self.left.len() - self.position
    }
}

impl FrameSource for BufferedSource {
    fn next_frame(&mut self) -> Result<Option<StereoFrame>, TdoaError> {
        if self.position >= self.left.len() {
            return Ok(None);
        }

        let end = (self.position + self.frame_size).min(self.left.len());
        let frame = StereoFrame {
            left: self.left[self.position..end].to_vec(),
            right: self.right[self.position..end].to_vec(),
        };
        self.position = end;
        Ok(Some(frame))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_source_frames() {
        let left: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let right: Vec<f32> = (0..10).map(|i| -(i as f32)).collect();
        let mut source = BufferedSource::new(left, right, 8000, 4).unwrap();

        let sizes: Vec<usize> = std::iter::from_fn(|| source.next_frame().unwrap())
            .map(|frame| frame.len())
            .collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(source.remaining(), 0);
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_buffered_source_preserves_order() {
        let mut source =
            BufferedSource::new(vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], 8000, 2).unwrap();
        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.left, vec![1.0, 2.0]);
        assert_eq!(frame.right, vec![4.0, 5.0]);
    }

    #[test]
    fn test_rejects_mismatched_channels() {
        assert!(BufferedSource::new(vec![0.0; 3], vec![0.0; 4], 8000, 2).is_err());
        assert!(StereoFrame::new(vec![0.0; 3], vec![0.0; 2]).is_err());
        assert!(BufferedSource::new(vec![0.0; 3], vec![0.0; 3], 8000, 0).is_err());
    }
}
