//! Channel layout utilities (interleaved input to a left/right pair)

use crate::error::TdoaError;

/// Which physical channel feeds the estimator's left input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    /// Channel 0 is left, channel 1 is right
    #[default]
    Normal,
    /// Channel 0 is right, channel 1 is left (mirrors the bearing)
    Swapped,
}

impl ChannelOrder {
    /// Arrange a channel pair according to this order
    pub fn apply(self, first: Vec<f32>, second: Vec<f32>) -> (Vec<f32>, Vec<f32>) {
        match self {
            ChannelOrder::Normal => (first, second),
            ChannelOrder::Swapped => (second, first),
        }
    }
}

/// Split interleaved audio into its first two channels
///
/// Extra channels are ignored and a trailing partial frame is dropped.
///
/// # Errors
///
/// Returns `TdoaError::InvalidInput` for fewer than two channels; a time
/// difference needs two sensors.
pub fn deinterleave(samples: &[f32], channels: usize) -> Result<(Vec<f32>, Vec<f32>), TdoaError> {
    if channels < 2 {
        return Err(TdoaError::InvalidInput(format!(
            "Need at least 2 channels for delay estimation, got {}",
            channels
        )));
    }

    let frames = samples.len() / channels;
    if samples.len() % channels != 0 {
        log::warn!(
            "Dropping {} trailing samples of a partial frame",
            samples.len() % channels
        );
    }
    if channels > 2 {
        log::debug!("Using channels 0 and 1 of {}", channels);
    }

    let mut left = Vec::with_capacity(frames);
    let mut right = Vec::with_capacity(frames);
    for frame in samples.chunks_exact(channels) {
        left.push(frame[0]);
        right.push(frame[1]);
    }

    Ok((left, right))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deinterleave_stereo() {
        let (left, right) = deinterleave(&[1.0, -1.0, 2.0, -2.0, 3.0, -3.0], 2).unwrap();
        assert_eq!(left, vec![1.0, 2.0, 3.0]);
        assert_eq!(right, vec![-1.0, -2.0, -3.0]);
    }

    #[test]
    fn test_deinterleave_multichannel_keeps_first_two() {
        let (left, right) = deinterleave(&[1.0, 2.0, 9.0, 3.0, 4.0, 9.0, 5.0], 3).unwrap();
        assert_eq!(left, vec![1.0, 3.0]);
        assert_eq!(right, vec![2.0, 4.0]);
    }

    #[test]
    fn test_mono_rejected() {
        assert!(matches!(
            deinterleave(&[0.0; 8], 1),
            Err(TdoaError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_swap() {
        let (left, right) = ChannelOrder::Swapped.apply(vec![1.0], vec![2.0]);
        assert_eq!((left, right), (vec![2.0], vec![1.0]));
        let (left, right) = ChannelOrder::Normal.apply(vec![1.0], vec![2.0]);
        assert_eq!((left, right), (vec![1.0], vec![2.0]));
    }
}
