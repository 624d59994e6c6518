use std::{collections::BTreeSet, process::Command};

use crate::foundation::error::{WisdomError, WisdomResult};

/// Container and codec pairs, most preferred first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum RecordingFormat {
    WebmVp9Opus,
    Webm,
    Mp4,
}

impl RecordingFormat {
    pub const PREFERENCE: [RecordingFormat; 3] = [Self::WebmVp9Opus, Self::Webm, Self::Mp4];

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::WebmVp9Opus => "video/webm;codecs=vp9,opus",
            Self::Webm => "video/webm",
            Self::Mp4 => "video/mp4",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::WebmVp9Opus | Self::Webm => "webm",
            Self::Mp4 => "mp4",
        }
    }

    pub fn video_encoder(self) -> &'static str {
        match self {
            Self::WebmVp9Opus => "libvpx-vp9",
            Self::Webm => "libvpx",
            Self::Mp4 => "libx264",
        }
    }

    pub fn audio_encoder(self) -> &'static str {
        match self {
            Self::WebmVp9Opus => "libopus",
            Self::Webm => "libvorbis",
            Self::Mp4 => "aac",
        }
    }

    /// Output codec arguments for ffmpeg at `video_bitrate` bits per second.
    pub fn codec_args(self, video_bitrate: u32, with_audio: bool) -> Vec<String> {
        let video_bitrate = format!("{}k", (video_bitrate / 1000).max(1000));
        let mut args = vec![
            "-c:v".to_string(),
            self.video_encoder().to_string(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
            "-b:v".to_string(),
            video_bitrate,
        ];
        if with_audio {
            args.extend([
                "-c:a".to_string(),
                self.audio_encoder().to_string(),
                "-b:a".to_string(),
                "128k".to_string(),
            ]);
        } else {
            args.push("-an".to_string());
        }
        match self {
            Self::WebmVp9Opus | Self::Webm => {
                args.extend(["-deadline".to_string(), "realtime".to_string()]);
            }
            Self::Mp4 => {
                args.extend([
                    "-preset".to_string(),
                    "medium".to_string(),
                    "-movflags".to_string(),
                    "+faststart".to_string(),
                ]);
            }
        }
        args
    }
}

/// What the recording backend can produce.
pub trait FormatSupport {
    fn supports(&self, format: RecordingFormat) -> bool;
}

/// First supported format in preference order.
pub fn select_format<S: FormatSupport + ?Sized>(support: &S) -> WisdomResult<RecordingFormat> {
    RecordingFormat::PREFERENCE
        .into_iter()
        .find(|f| support.supports(*f))
        .ok_or_else(|| {
            WisdomError::unsupported_format(
                "no WebM (VP9/Opus, VP8/Vorbis) or MP4 (H.264/AAC) encoder is available",
            )
        })
}

/// Encoder names reported by `ffmpeg -encoders`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FfmpegEncoders {
    names: BTreeSet<String>,
}

impl FfmpegEncoders {
    pub fn probe() -> WisdomResult<Self> {
        let out = Command::new("ffmpeg")
            .args(["-hide_banner", "-encoders"])
            .output()
            .map_err(|e| {
                WisdomError::unsupported_format(format!("failed to run ffmpeg -encoders: {e}"))
            })?;
        if !out.status.success() {
            return Err(WisdomError::unsupported_format(format!(
                "ffmpeg -encoders exited with status {}",
                out.status
            )));
        }
        Ok(Self::parse(&String::from_utf8_lossy(&out.stdout)))
    }

    /// Parse the listing: a legend, a `------` separator, then `FLAGS name description` rows.
    pub fn parse(listing: &str) -> Self {
        let names = listing
            .lines()
            .skip_while(|l| !l.trim_start().starts_with("------"))
            .skip(1)
            .filter_map(|l| l.split_whitespace().nth(1))
            .map(str::to_string)
            .collect();
        Self { names }
    }

    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            names: names.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl FormatSupport for FfmpegEncoders {
    fn supports(&self, format: RecordingFormat) -> bool {
        self.has(format.video_encoder()) && self.has(format.audio_encoder())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/format.rs"]
mod tests;
