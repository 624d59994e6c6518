use std::time::Duration;

/// Progress while recording: 40% at start, rising linearly to 100% at the narration's end,
/// floored and capped at 99 until the file is finalized.
pub fn capture_progress(elapsed: Duration, duration: Duration) -> u8 {
    if duration.is_zero() {
        return 99;
    }
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    (40.0 + ratio * 60.0).min(99.0).floor() as u8
}

/// Fixed-interval elapsed counter: one tick per output frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureClock {
    fps: u32,
    duration: Duration,
    frames: u64,
}

impl CaptureClock {
    pub fn new(fps: u32, duration: Duration) -> Self {
        Self {
            fps: fps.max(1),
            duration,
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.frames as f64 / f64::from(self.fps))
    }

    /// Elapsed time has reached the target duration.
    pub fn is_finished(&self) -> bool {
        // frames / fps >= duration, in integer microseconds.
        u128::from(self.frames) * 1_000_000 >= self.duration.as_micros() * u128::from(self.fps)
    }

    /// Advance one frame and return the progress percentage.
    pub fn tick(&mut self) -> u8 {
        self.frames += 1;
        capture_progress(self.elapsed(), self.duration)
    }

    /// Total frames a full run produces.
    pub fn total_frames(&self) -> u64 {
        let fps = u128::from(self.fps);
        let micros = self.duration.as_micros() * fps;
        micros.div_ceil(1_000_000) as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/clock.rs"]
mod tests;
