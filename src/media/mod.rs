pub mod audio_context;
pub mod pcm;
pub mod video;

pub use audio_context::{AudioContext, AudioContextSlot, ContextState};
pub use pcm::{AudioBuffer, NARRATION_SAMPLE_RATE, decode_narration};
pub use video::{BackgroundSource, LoopingVideo, VideoSourceInfo, probe_video};
