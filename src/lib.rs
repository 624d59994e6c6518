//! Ali Wisdom Shorts: turns a saying into a narrated 1080x1920 video.
//!
//! One production cycle:
//!
//! - fetch a quote for a category ([`services::QuoteSource`]) and a stock background video
//!   ([`services::MediaSearch`])
//! - synthesize the narration ([`services::NarrationSynthesizer`])
//! - composite the bilingual text over the looping background ([`render::FrameCompositor`])
//! - record frames and narration into one file for exactly the narration's length
//!   ([`capture::CapturePipeline`])
//!
//! [`studio::Studio`] sequences all of it behind the [`status::GenerationStatus`] state machine.
#![forbid(unsafe_code)]

pub mod capture;
pub mod catalog;
pub mod config;
pub mod encode;
pub mod foundation;
pub mod logging;
pub mod media;
pub mod model;
pub mod render;
pub mod services;
pub mod status;
pub mod studio;
pub mod text;

pub use capture::{CaptureOptions, CapturePipeline, FfmpegRecorder};
pub use catalog::Voice;
pub use config::AppConfig;
pub use foundation::{
    core::{Canvas, Rgba8},
    error::{WisdomError, WisdomResult},
};
pub use media::{AudioContextSlot, LoopingVideo};
pub use model::{CapturedArtifact, Quote, RenderSettings};
pub use render::{FrameCompositor, Surface};
pub use status::{GenerationStatus, Phase};
pub use studio::Studio;
pub use text::{FontBook, TextEngine};
