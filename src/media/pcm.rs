//! Narration payload decoding: base64 text to little-endian signed 16-bit mono PCM to `f32`.

use std::{io::Write, path::Path};

use base64::Engine as _;

use crate::foundation::error::{WisdomError, WisdomResult};

/// Sample rate the speech service produces.
pub const NARRATION_SAMPLE_RATE: u32 = 24_000;

#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved samples in `[-1, 1]`.
    pub samples: Vec<f32>,
}

impl AudioBuffer {
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / usize::from(self.channels)
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frame_count() as f64 / f64::from(self.sample_rate)
        }
    }

    /// Raw `f32le` interleaved samples, the format ffmpeg reads with `-f f32le`.
    pub fn write_f32le(&self, mut w: impl Write) -> WisdomResult<()> {
        let mut bytes = Vec::with_capacity(self.samples.len() * 4);
        for s in &self.samples {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        w.write_all(&bytes)
            .and_then(|()| w.flush())
            .map_err(|e| WisdomError::encode(format!("write f32le audio: {e}")))
    }

    /// 16-bit PCM WAV copy of the narration.
    pub fn write_wav(&self, path: &Path) -> WisdomResult<()> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec)
            .map_err(|e| WisdomError::encode(format!("create wav '{}': {e}", path.display())))?;
        for &s in &self.samples {
            let v = (s.clamp(-1.0, 1.0) * 32767.0).round() as i16;
            writer
                .write_sample(v)
                .map_err(|e| WisdomError::encode(format!("write wav sample: {e}")))?;
        }
        writer
            .finalize()
            .map_err(|e| WisdomError::encode(format!("finalize wav: {e}")))
    }
}

pub fn decode_base64_payload(payload: &str) -> WisdomResult<Vec<u8>> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Err(WisdomError::decode("narration payload is empty"));
    }
    base64::engine::general_purpose::STANDARD
        .decode(trimmed)
        .map_err(|e| WisdomError::decode(format!("invalid base64: {e}")))
}

/// Interpret bytes as little-endian `i16` samples, each scaled by `1 / 32768`.
pub fn decode_pcm_s16le(bytes: &[u8], sample_rate: u32, channels: u16) -> WisdomResult<AudioBuffer> {
    if bytes.is_empty() {
        return Err(WisdomError::decode("narration contains no samples"));
    }
    if !bytes.len().is_multiple_of(2) {
        return Err(WisdomError::decode(format!(
            "odd byte count {} for 16-bit samples",
            bytes.len()
        )));
    }
    if channels == 0 || sample_rate == 0 {
        return Err(WisdomError::decode("sample rate and channel count must be > 0"));
    }
    let sample_count = bytes.len() / 2;
    if !sample_count.is_multiple_of(usize::from(channels)) {
        return Err(WisdomError::decode(format!(
            "{sample_count} samples do not divide into {channels} channels"
        )));
    }

    let samples = bytes
        .chunks_exact(2)
        .map(|c| f32::from(i16::from_le_bytes([c[0], c[1]])) / 32768.0)
        .collect();
    Ok(AudioBuffer {
        sample_rate,
        channels,
        samples,
    })
}

/// Base64 narration payload to a mono buffer at `sample_rate`.
pub fn decode_narration(payload: &str, sample_rate: u32) -> WisdomResult<AudioBuffer> {
    let bytes = decode_base64_payload(payload)?;
    decode_pcm_s16le(&bytes, sample_rate, 1)
}

#[cfg(test)]
#[path = "../../tests/unit/media/pcm.rs"]
mod tests;
