//! Background video probing and looping decode through the system `ffprobe`/`ffmpeg` binaries.

use std::{
    io::Read,
    path::{Path, PathBuf},
    process::{Child, ChildStdout, Command, Stdio},
};

use crate::{
    foundation::error::{WisdomError, WisdomResult},
    render::BackgroundFrame,
};

#[derive(Clone, Debug)]
pub struct VideoSourceInfo {
    pub source_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps_num: u32,
    pub fps_den: u32,
    pub duration_sec: f64,
}

impl VideoSourceInfo {
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }

    fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Supplies one background frame per output frame; `None` means draw the gradient.
pub trait BackgroundSource {
    fn next_frame(&mut self) -> Option<BackgroundFrame>;
}

pub fn probe_video(source_path: &Path) -> WisdomResult<VideoSourceInfo> {
    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| WisdomError::render(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(WisdomError::render(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_json(source_path, &out.stdout)
}

/// Source info from `ffprobe -print_format json` output.
///
/// Width and height are the displayed size: ffmpeg applies rotation metadata when decoding, so a
/// quarter turn swaps the stored dimensions.
fn parse_probe_json(source_path: &Path, json: &[u8]) -> WisdomResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeSideData {
        rotation: Option<f64>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeTags {
        rotate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        #[serde(default)]
        side_data_list: Vec<ProbeSideData>,
        tags: Option<ProbeTags>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| WisdomError::render(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| WisdomError::render("no video stream found"))?;
    let (Some(width), Some(height)) = (stream.width, stream.height) else {
        return Err(WisdomError::render("missing video dimensions from ffprobe"));
    };
    let rotation = stream
        .side_data_list
        .iter()
        .find_map(|d| d.rotation)
        .or_else(|| {
            stream
                .tags
                .as_ref()
                .and_then(|t| t.rotate.as_deref())
                .and_then(|r| r.trim().parse::<f64>().ok())
        })
        .unwrap_or(0.0);
    let (width, height) = if is_quarter_turn(rotation) {
        tracing::debug!(rotation, "rotated video stream; using displayed size");
        (height, width)
    } else {
        (width, height)
    };

    let (fps_num, fps_den) = parse_ff_ratio(stream.r_frame_rate.as_deref().unwrap_or("0/1"))
        .ok_or_else(|| WisdomError::render("invalid video r_frame_rate"))?;
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps_num,
        fps_den,
        duration_sec,
    })
}

fn is_quarter_turn(rotation_deg: f64) -> bool {
    rotation_deg.is_finite() && ((rotation_deg / 90.0).round() as i64).rem_euclid(2) == 1
}

/// Muted background video restarted from the beginning whenever it ends.
pub struct LoopingVideo {
    info: VideoSourceInfo,
    child: Child,
    stdout: ChildStdout,
    last: Option<BackgroundFrame>,
    exhausted: bool,
}

impl LoopingVideo {
    /// Start decoding `path`, resampled to `fps` output frames per second.
    pub fn open(path: &Path, fps: u32) -> WisdomResult<Self> {
        let info = probe_video(path)?;
        if info.frame_len() == 0 {
            return Err(WisdomError::render("background video has no pixels"));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-v", "error", "-stream_loop", "-1", "-i"])
            .arg(path)
            .args([
                "-an",
                "-vf",
                &format!("fps={fps}"),
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        tracing::debug!(?cmd, "spawning background decoder");

        let mut child = cmd
            .spawn()
            .map_err(|e| WisdomError::render(format!("failed to spawn ffmpeg decoder: {e}")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| WisdomError::render("ffmpeg decoder stdout not available"))?;

        Ok(Self {
            info,
            child,
            stdout,
            last: None,
            exhausted: false,
        })
    }

    pub fn info(&self) -> &VideoSourceInfo {
        &self.info
    }

    fn read_frame(&mut self) -> WisdomResult<BackgroundFrame> {
        let mut buf = vec![0u8; self.info.frame_len()];
        self.stdout
            .read_exact(&mut buf)
            .map_err(|e| WisdomError::render(format!("background decode stopped: {e}")))?;
        BackgroundFrame::new(self.info.width, self.info.height, buf)
    }
}

impl BackgroundSource for LoopingVideo {
    /// On decoder failure the last good frame is held (or the gradient, if none was read).
    fn next_frame(&mut self) -> Option<BackgroundFrame> {
        if !self.exhausted {
            match self.read_frame() {
                Ok(frame) => self.last = Some(frame),
                Err(e) => {
                    tracing::warn!(error = %e, "background video unavailable; holding last frame");
                    self.exhausted = true;
                }
            }
        }
        self.last.clone()
    }
}

impl Drop for LoopingVideo {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Decode the single frame shown at `time_sec`.
pub fn frame_at(path: &Path, time_sec: f64) -> WisdomResult<BackgroundFrame> {
    let info = probe_video(path)?;
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-ss", &format!("{:.6}", time_sec.max(0.0))])
        .arg("-i")
        .arg(path)
        .args([
            "-frames:v",
            "1",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "pipe:1",
        ])
        .output()
        .map_err(|e| WisdomError::render(format!("failed to run ffmpeg for frame decode: {e}")))?;
    if !out.status.success() {
        return Err(WisdomError::render(format!(
            "ffmpeg frame decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let expected = info.frame_len();
    if expected == 0 || out.stdout.len() < expected {
        return Err(WisdomError::render(format!(
            "decoded frame has {} bytes, expected {expected}",
            out.stdout.len()
        )));
    }
    let mut bytes = out.stdout;
    bytes.truncate(expected);
    BackgroundFrame::new(info.width, info.height, bytes)
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let (num, den) = s.split_once('/').unwrap_or((s, "1"));
    let num = num.trim().parse::<u32>().ok()?;
    let den = den.trim().parse::<u32>().ok()?;
    (den != 0).then_some((num, den))
}

#[cfg(test)]
#[path = "../../tests/unit/media/video.rs"]
mod tests;
