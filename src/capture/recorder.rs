use std::path::PathBuf;

use crate::{
    encode::{
        ffmpeg::{AudioInput, EncodeConfig, FfmpegEncoder, is_ffmpeg_on_path},
        format::{FfmpegEncoders, FormatSupport, RecordingFormat},
    },
    foundation::error::WisdomResult,
    render::FrameRGBA,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordingSpec {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
    pub video_bitrate: u32,
}

/// A recording in progress.
pub trait RecordingSession {
    fn write_frame(&mut self, frame: &FrameRGBA) -> WisdomResult<()>;

    /// Finalize the file and return where it was written.
    fn stop(self) -> WisdomResult<PathBuf>;

    /// Give up on the recording: end the encoder and remove whatever it wrote.
    fn abort(self);
}

/// Binds a frame stream and one audio track into a single file.
pub trait MediaRecorder: FormatSupport {
    type Session: RecordingSession;

    fn start(
        &mut self,
        format: RecordingFormat,
        spec: &RecordingSpec,
        audio: &AudioInput,
    ) -> WisdomResult<Self::Session>;
}

/// Recorder backed by the system ffmpeg and whichever encoders it was built with.
#[derive(Clone, Debug, Default)]
pub struct FfmpegRecorder {
    encoders: FfmpegEncoders,
}

impl FfmpegRecorder {
    /// Probe ffmpeg for encoders. A missing binary supports nothing.
    pub fn detect() -> Self {
        if !is_ffmpeg_on_path() {
            tracing::warn!("ffmpeg not found on PATH; recording is unavailable");
            return Self::default();
        }
        match FfmpegEncoders::probe() {
            Ok(encoders) => Self { encoders },
            Err(e) => {
                tracing::warn!(error = %e, "could not list ffmpeg encoders");
                Self::default()
            }
        }
    }

    pub fn with_encoders(encoders: FfmpegEncoders) -> Self {
        Self { encoders }
    }
}

impl FormatSupport for FfmpegRecorder {
    fn supports(&self, format: RecordingFormat) -> bool {
        self.encoders.supports(format)
    }
}

impl MediaRecorder for FfmpegRecorder {
    type Session = FfmpegEncoder;

    fn start(
        &mut self,
        format: RecordingFormat,
        spec: &RecordingSpec,
        audio: &AudioInput,
    ) -> WisdomResult<FfmpegEncoder> {
        let cfg = EncodeConfig {
            width: spec.width,
            height: spec.height,
            fps: spec.fps,
            out_path: spec.out_path.clone(),
            overwrite: true,
            format,
            video_bitrate: spec.video_bitrate,
            audio: Some(audio.clone()),
        };
        FfmpegEncoder::new(cfg, [0, 0, 0, 255])
    }
}

impl RecordingSession for FfmpegEncoder {
    fn write_frame(&mut self, frame: &FrameRGBA) -> WisdomResult<()> {
        self.encode_frame(frame)
    }

    fn stop(self) -> WisdomResult<PathBuf> {
        self.finish()
    }

    fn abort(self) {
        FfmpegEncoder::abort(self)
    }
}
