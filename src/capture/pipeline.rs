//! Timed capture: decode narration, record rendered frames plus the narration track, stop when the
//! narration has fully played.

use std::{
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use crate::{
    capture::{
        clock::CaptureClock,
        recorder::{MediaRecorder, RecordingSession, RecordingSpec},
    },
    encode::{ffmpeg::remove_partial_output, format::select_format},
    foundation::{core::Canvas, error::WisdomResult},
    media::{audio_context::AudioContextSlot, video::BackgroundSource},
    model::{CapturedArtifact, Quote, RenderSettings, artifact_file_name},
    render::{BackgroundFrame, FrameCompositor, Surface},
};

/// Draws one capture frame. Errors end the capture.
pub trait FrameRenderer {
    fn canvas(&self) -> Canvas;

    fn render(
        &mut self,
        surface: &mut Surface,
        quote: &Quote,
        settings: &RenderSettings,
        background: Option<&BackgroundFrame>,
    ) -> WisdomResult<()>;
}

impl FrameRenderer for FrameCompositor {
    fn canvas(&self) -> Canvas {
        FrameCompositor::canvas(self)
    }

    fn render(
        &mut self,
        surface: &mut Surface,
        quote: &Quote,
        settings: &RenderSettings,
        background: Option<&BackgroundFrame>,
    ) -> WisdomResult<()> {
        self.try_render_frame(surface, Some(quote), settings, background)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureOptions {
    pub fps: u32,
    pub video_bitrate: u32,
    pub out_dir: PathBuf,
    /// Also write the narration as a WAV next to the video.
    pub keep_narration: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            fps: 30,
            video_bitrate: 8_000_000,
            out_dir: PathBuf::from("out"),
            keep_narration: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CaptureEvent {
    NarrationDecoded { duration_secs: f64 },
    Progress(u8),
}

pub struct CapturePipeline<R, C> {
    renderer: R,
    recorder: C,
    options: CaptureOptions,
}

impl<R: FrameRenderer, C: MediaRecorder> CapturePipeline<R, C> {
    pub fn new(renderer: R, recorder: C, options: CaptureOptions) -> Self {
        Self {
            renderer,
            recorder,
            options,
        }
    }

    pub fn options(&self) -> &CaptureOptions {
        &self.options
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Record `quote` over the background for exactly the narration's duration.
    ///
    /// The audio context is suspended again afterwards whether or not the capture succeeded.
    #[tracing::instrument(skip_all, fields(category = %settings.category))]
    pub fn produce(
        &mut self,
        quote: &Quote,
        settings: &RenderSettings,
        narration_base64: &str,
        background: Option<&mut dyn BackgroundSource>,
        audio: &mut AudioContextSlot,
        on_event: &mut dyn FnMut(CaptureEvent),
    ) -> WisdomResult<CapturedArtifact> {
        let result = self.capture(quote, settings, narration_base64, background, audio, on_event);
        audio.suspend();
        result
    }

    fn capture(
        &mut self,
        quote: &Quote,
        settings: &RenderSettings,
        narration_base64: &str,
        mut background: Option<&mut dyn BackgroundSource>,
        audio: &mut AudioContextSlot,
        on_event: &mut dyn FnMut(CaptureEvent),
    ) -> WisdomResult<CapturedArtifact> {
        let ctx = audio.acquire()?;
        let narration = ctx.decode_narration(narration_base64)?;
        let duration_secs = narration.duration_secs();
        tracing::info!(duration_secs, "narration decoded");
        on_event(CaptureEvent::NarrationDecoded { duration_secs });

        let canvas = self.renderer.canvas();
        let mut surface = Surface::new(canvas)?;
        let format = select_format(&self.recorder)?;
        let audio_input = ctx.stage_buffer(&narration)?;

        let unix_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let file_name = artifact_file_name(&settings.category, unix_millis, format.extension());
        let spec = RecordingSpec {
            width: canvas.width,
            height: canvas.height,
            fps: self.options.fps,
            out_path: self.options.out_dir.join(&file_name),
            video_bitrate: self.options.video_bitrate,
        };
        tracing::info!(format = format.mime_type(), out = %spec.out_path.display(), "recording");

        let mut session = self.recorder.start(format, &spec, &audio_input)?;
        let mut clock = CaptureClock::new(self.options.fps, Duration::from_secs_f64(duration_secs));

        let recorded = (|| -> WisdomResult<()> {
            while !clock.is_finished() {
                let frame = background.as_deref_mut().and_then(|b| b.next_frame());
                self.renderer
                    .render(&mut surface, quote, settings, frame.as_ref())?;
                session.write_frame(&surface.to_frame())?;
                on_event(CaptureEvent::Progress(clock.tick()));
            }
            Ok(())
        })();
        if let Err(e) = recorded {
            session.abort();
            return Err(e);
        }

        let path = match session.stop() {
            Ok(path) => path,
            Err(e) => {
                remove_partial_output(&spec.out_path);
                return Err(e);
            }
        };

        let narration_path = if self.options.keep_narration {
            let wav = path.with_extension("wav");
            narration.write_wav(&wav)?;
            Some(wav)
        } else {
            None
        };

        tracing::info!(frames = clock.frames(), path = %path.display(), "capture complete");
        Ok(CapturedArtifact {
            path,
            file_name,
            mime_type: format.mime_type().to_string(),
            duration_secs: clock.elapsed().as_secs_f64(),
            frame_count: clock.frames(),
            narration_path,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/pipeline.rs"]
mod tests;
