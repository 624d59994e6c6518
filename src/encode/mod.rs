pub mod ffmpeg;
pub mod format;

pub use ffmpeg::{AudioInput, EncodeConfig, FfmpegEncoder, is_ffmpeg_on_path};
pub use format::{FfmpegEncoders, FormatSupport, RecordingFormat, select_format};
