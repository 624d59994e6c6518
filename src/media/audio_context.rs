use crate::{
    encode::ffmpeg::AudioInput,
    foundation::error::{WisdomError, WisdomResult},
    media::pcm::{self, AudioBuffer},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextState {
    Running,
    Suspended,
}

/// Decodes narration and stages it as encoder input inside a scratch directory.
#[derive(Debug)]
pub struct AudioContext {
    sample_rate: u32,
    state: ContextState,
    scratch: tempfile::TempDir,
    staged: u64,
}

impl AudioContext {
    pub fn new(sample_rate: u32) -> WisdomResult<Self> {
        if sample_rate == 0 {
            return Err(WisdomError::validation("audio context sample rate must be > 0"));
        }
        let scratch = tempfile::Builder::new()
            .prefix("aliwisdom-audio-")
            .tempdir()
            .map_err(|e| WisdomError::encode(format!("create audio scratch dir: {e}")))?;
        tracing::debug!(sample_rate, dir = %scratch.path().display(), "audio context created");
        Ok(Self {
            sample_rate,
            state: ContextState::Running,
            scratch,
            staged: 0,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn resume(&mut self) {
        if self.state == ContextState::Suspended {
            tracing::debug!("audio context resumed");
            self.state = ContextState::Running;
        }
    }

    pub fn suspend(&mut self) {
        self.state = ContextState::Suspended;
    }

    pub fn decode_narration(&self, payload: &str) -> WisdomResult<AudioBuffer> {
        pcm::decode_narration(payload, self.sample_rate)
    }

    /// Write `buffer` as raw `f32le` for the encoder to mux.
    pub fn stage_buffer(&mut self, buffer: &AudioBuffer) -> WisdomResult<AudioInput> {
        if self.state != ContextState::Running {
            return Err(WisdomError::encode("audio context is suspended"));
        }
        self.staged += 1;
        let path = self
            .scratch
            .path()
            .join(format!("narration-{}.f32le", self.staged));
        let file = std::fs::File::create(&path)
            .map_err(|e| WisdomError::encode(format!("create '{}': {e}", path.display())))?;
        buffer.write_f32le(std::io::BufWriter::new(file))?;
        Ok(AudioInput {
            path,
            sample_rate: buffer.sample_rate,
            channels: buffer.channels,
        })
    }
}

/// Lazily created, reused audio context.
#[derive(Debug)]
pub struct AudioContextSlot {
    sample_rate: u32,
    inner: Option<AudioContext>,
}

impl AudioContextSlot {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            inner: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.is_some()
    }

    /// The context, created on first use and resumed if it was suspended.
    pub fn acquire(&mut self) -> WisdomResult<&mut AudioContext> {
        let ctx = match &mut self.inner {
            Some(ctx) => ctx,
            slot @ None => slot.insert(AudioContext::new(self.sample_rate)?),
        };
        ctx.resume();
        Ok(ctx)
    }

    pub fn suspend(&mut self) {
        if let Some(ctx) = &mut self.inner {
            ctx.suspend();
        }
    }

    pub fn state(&self) -> Option<ContextState> {
        self.inner.as_ref().map(AudioContext::state)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/audio_context.rs"]
mod tests;
