pub mod clock;
pub mod pipeline;
pub mod recorder;

pub use clock::{CaptureClock, capture_progress};
pub use pipeline::{CaptureEvent, CaptureOptions, CapturePipeline, FrameRenderer};
pub use recorder::{FfmpegRecorder, MediaRecorder, RecordingSession, RecordingSpec};
