//! Audio decoding using Symphonia
//!
//! Decodes a multichannel file into the left/right pair the estimator
//! consumes. Mono files are rejected here, before any samples reach the core.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::frame_source::BufferedSource;
use crate::error::TdoaError;
use crate::preprocessing::channel_mixer::deinterleave;

/// Decoded two-channel audio
#[derive(Debug, Clone)]
pub struct DecodedStereo {
    /// First channel
    pub left: Vec<f32>,
    /// Second channel
    pub right: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count of the source file
    pub source_channels: usize,
}

impl DecodedStereo {
    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.left.len() as f32 / self.sample_rate as f32
    }

    /// Serve the decoded audio as frames of `frame_size` samples
    pub fn into_source(self, frame_size: usize) -> Result<BufferedSource, TdoaError> {
        BufferedSource::new(self.left, self.right, self.sample_rate, frame_size)
    }
}

/// Decode an audio file to a left/right pair
///
/// # Errors
///
/// - `DecodingError` if the file cannot be opened, probed or decoded
/// - `InvalidInput` if the file has fewer than two channels
pub fn decode_stereo(path: impl AsRef<Path>) -> Result<DecodedStereo, TdoaError> {
    let path = path.as_ref();
    log::debug!("Decoding audio file: {}", path.display());

    let src = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| TdoaError::DecodingError("No supported audio tracks found".to_string()))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| TdoaError::DecodingError("Track has no sample rate".to_string()))?;
    let mut channels = codec_params.channels.map(|c| c.count()).unwrap_or(0);

    let mut decoder =
        symphonia::default::get_codecs().make(&codec_params, &DecoderOptions::default())?;

    let mut interleaved: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                channels = spec.channels.count();
                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                interleaved.extend_from_slice(buffer.samples());
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                // Corrupted packet: skip it, keep the rest of the stream
                log::warn!("Skipping undecodable packet: {}", msg);
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let (left, right) = deinterleave(&interleaved, channels)?;

    log::debug!(
        "Decoded {} samples per channel at {} Hz ({} source channels)",
        left.len(),
        sample_rate,
        channels
    );

    Ok(DecodedStereo {
        left,
        right,
        sample_rate,
        source_channels: channels,
    })
}
