//! Streaming encoder around the system `ffmpeg` binary: raw RGBA frames on stdin, an optional
//! `f32le` narration file as a second input.

use std::{
    io::Write as _,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    encode::format::RecordingFormat,
    foundation::error::{WisdomError, WisdomResult},
    render::FrameRGBA,
};

/// Raw interleaved `f32le` samples on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioInput {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
    pub format: RecordingFormat,
    pub video_bitrate: u32,
    pub audio: Option<AudioInput>,
}

impl EncodeConfig {
    pub fn validate(&self) -> WisdomResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(WisdomError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(WisdomError::validation("encode fps must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(WisdomError::validation(
                "encode width/height must be even (required for yuv420p output)",
            ));
        }
        if let Some(audio) = &self.audio
            && (audio.sample_rate == 0 || audio.channels == 0)
        {
            return Err(WisdomError::validation(
                "audio input needs a sample rate and at least one channel",
            ));
        }
        Ok(())
    }

    fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = [
            if self.overwrite { "-y" } else { "-n" },
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();
        args.extend([
            format!("{}x{}", self.width, self.height),
            "-r".to_string(),
            self.fps.to_string(),
            "-i".to_string(),
            "pipe:0".to_string(),
        ]);

        if let Some(audio) = &self.audio {
            args.extend([
                "-f".to_string(),
                "f32le".to_string(),
                "-ar".to_string(),
                audio.sample_rate.to_string(),
                "-ac".to_string(),
                audio.channels.to_string(),
                "-i".to_string(),
                audio.path.display().to_string(),
                "-map".to_string(),
                "0:v".to_string(),
                "-map".to_string(),
                "1:a".to_string(),
            ]);
        }

        args.extend(
            self.format
                .codec_args(self.video_bitrate, self.audio.is_some()),
        );
        args.push(self.out_path.display().to_string());
        args
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> WisdomResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    bg_rgba: [u8; 4],
    child: Child,
    stdin: Option<ChildStdin>,
    scratch: Vec<u8>,
    frames: u64,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig, bg_rgba: [u8; 4]) -> WisdomResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(WisdomError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(WisdomError::unsupported_format(
                "ffmpeg is required for recording, but was not found on PATH",
            ));
        }

        let args = cfg.args();
        tracing::debug!(args = %args.join(" "), "spawning ffmpeg encoder");
        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                WisdomError::encode(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| WisdomError::encode("failed to open ffmpeg stdin"))?;

        Ok(Self {
            scratch: vec![0u8; cfg.width as usize * cfg.height as usize * 4],
            cfg,
            bg_rgba,
            child,
            stdin: Some(stdin),
            frames: 0,
        })
    }

    pub fn encode_frame(&mut self, frame: &FrameRGBA) -> WisdomResult<()> {
        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(WisdomError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(WisdomError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        flatten_to_opaque_rgba8(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            self.bg_rgba,
        )?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(WisdomError::encode("ffmpeg encoder is already finalized"));
        };
        stdin
            .write_all(&self.scratch)
            .map_err(|e| WisdomError::encode(format!("failed to write frame to ffmpeg: {e}")))?;
        self.frames += 1;
        Ok(())
    }

    pub fn finish(mut self) -> WisdomResult<PathBuf> {
        drop(self.stdin.take());

        let output = self
            .child
            .wait_with_output()
            .map_err(|e| WisdomError::encode(format!("failed to wait for ffmpeg: {e}")))?;
        if !output.status.success() {
            return Err(WisdomError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        tracing::debug!(
            frames = self.frames,
            out = %self.cfg.out_path.display(),
            "encoder finished"
        );
        Ok(self.cfg.out_path)
    }

    /// Kill ffmpeg, reap it, then delete the partial output.
    pub fn abort(mut self) {
        drop(self.stdin.take());
        if let Err(e) = self.child.kill() {
            tracing::debug!(error = %e, "ffmpeg already exited");
        }
        match self.child.wait() {
            Ok(status) => tracing::debug!(%status, frames = self.frames, "encoder aborted"),
            Err(e) => tracing::warn!(error = %e, "failed to reap ffmpeg"),
        }
        remove_partial_output(&self.cfg.out_path);
    }
}

/// Remove a half-written output file. Missing files are fine.
pub(crate) fn remove_partial_output(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not remove partial output")
        }
    }
}

/// Composite `src` over an opaque `bg_rgba` so every output pixel has alpha 255.
pub fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> WisdomResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(WisdomError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            let fg = if src_is_premul {
                u16::from(s[c])
            } else {
                mul_div255(u16::from(s[c]), a)
            };
            d[c] = (fg + mul_div255(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
