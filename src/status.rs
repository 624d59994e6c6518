//! Generation status: the one state machine gating which user actions are permitted.
//!
//! ```text
//! Idle ──BeginFetch──> FetchingQuote ──FetchSucceeded──> Idle
//!                            └──────FetchFailed──────> Error ──BeginFetch──> FetchingQuote
//! Idle ──BeginProduction──> SynthesizingNarration ──NarrationReady──> RenderingVideo
//! RenderingVideo ──Captured──> Complete
//! SynthesizingNarration | RenderingVideo ──ProductionFailed──> Error
//! Complete | Error ──Dismiss──> Idle
//! ```

use std::fmt;

use crate::foundation::error::{WisdomError, WisdomResult};

pub const FETCH_MESSAGE: &str = "Consulting the Peak of Eloquence...";
pub const RETRY_MESSAGE: &str = "Retrying wisdom fetch...";
pub const NARRATING_MESSAGE: &str = "Narrating Wisdom...";
pub const RENDERING_MESSAGE: &str = "Rendering Short...";
pub const COMPLETE_MESSAGE: &str = "Ali Wisdom Produced!";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    FetchingQuote,
    SynthesizingNarration,
    RenderingVideo,
    Complete,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusEvent {
    BeginFetch,
    FetchSucceeded,
    FetchFailed,
    BeginProduction,
    NarrationReady,
    Progress(u8),
    Captured,
    ProductionFailed { message: String },
    Dismiss,
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEvent::BeginFetch => f.write_str("begin-fetch"),
            StatusEvent::FetchSucceeded => f.write_str("fetch-succeeded"),
            StatusEvent::FetchFailed => f.write_str("fetch-failed"),
            StatusEvent::BeginProduction => f.write_str("begin-production"),
            StatusEvent::NarrationReady => f.write_str("narration-ready"),
            StatusEvent::Progress(p) => write!(f, "progress({p})"),
            StatusEvent::Captured => f.write_str("captured"),
            StatusEvent::ProductionFailed { .. } => f.write_str("production-failed"),
            StatusEvent::Dismiss => f.write_str("dismiss"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct GenerationStatus {
    pub phase: Phase,
    /// Percentage in `0..=100`.
    pub progress: u8,
    pub message: String,
}

impl Default for GenerationStatus {
    fn default() -> Self {
        Self::idle()
    }
}

impl GenerationStatus {
    pub fn idle() -> Self {
        Self::at(Phase::Idle, 0, "")
    }

    fn at(phase: Phase, progress: u8, message: impl Into<String>) -> Self {
        Self {
            phase,
            progress: progress.min(100),
            message: message.into(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Next status for `event`, or a validation error when the table has no such edge.
    pub fn apply(&self, event: StatusEvent) -> WisdomResult<GenerationStatus> {
        use Phase::*;

        let next = match (self.phase, &event) {
            (Idle | Error | Complete, StatusEvent::BeginFetch) => {
                Self::at(FetchingQuote, 10, FETCH_MESSAGE)
            }
            (FetchingQuote, StatusEvent::FetchSucceeded) => Self::idle(),
            (FetchingQuote, StatusEvent::FetchFailed) => Self::at(Error, 0, RETRY_MESSAGE),
            (Idle, StatusEvent::BeginProduction) => {
                Self::at(SynthesizingNarration, 10, NARRATING_MESSAGE)
            }
            (SynthesizingNarration, StatusEvent::NarrationReady) => {
                Self::at(RenderingVideo, 40, RENDERING_MESSAGE)
            }
            (RenderingVideo, StatusEvent::Progress(p)) => {
                // Never moves backwards and never reports completion before the file exists.
                let progress = (*p).clamp(self.progress, 99);
                Self::at(RenderingVideo, progress, self.message.clone())
            }
            (RenderingVideo, StatusEvent::Captured) => Self::at(Complete, 100, COMPLETE_MESSAGE),
            (SynthesizingNarration | RenderingVideo, StatusEvent::ProductionFailed { message }) => {
                Self::at(Error, 0, format!("Error: {message}"))
            }
            (Complete | Error, StatusEvent::Dismiss) => Self::idle(),
            (phase, event) => {
                return Err(WisdomError::validation(format!(
                    "invalid status transition: {event} while {phase:?}"
                )));
            }
        };
        Ok(next)
    }
}

#[cfg(test)]
#[path = "../tests/unit/status.rs"]
mod tests;
