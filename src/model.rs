use std::path::PathBuf;

use crate::{
    catalog::{self, Voice},
    foundation::error::{WisdomError, WisdomResult},
};

/// One saying in both scripts plus the narration text read aloud.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Original-language text (primary script). May be empty when unknown.
    #[serde(default)]
    pub arabic: String,
    /// Translation shown under the original (secondary script).
    pub urdu: String,
    pub narration_script: String,
    pub source: String,
    #[serde(default)]
    pub category: String,
}

impl Quote {
    /// Combined character count of both scripts, used for font tier selection.
    pub fn combined_char_count(&self) -> usize {
        self.arabic.chars().count() + self.urdu.chars().count()
    }

    pub fn validate(&self) -> WisdomResult<()> {
        if self.urdu.trim().is_empty() {
            return Err(WisdomError::validation("quote translation text is empty"));
        }
        if self.narration_script.trim().is_empty() {
            return Err(WisdomError::validation("quote narration script is empty"));
        }
        Ok(())
    }
}

/// User-controlled knobs read by the compositor every frame.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub template_id: String,
    /// Preview text size. The export compositor uses its own two-tier policy.
    pub font_size_hint: u32,
    pub voice: Voice,
    pub include_arabic: bool,
    pub category: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            template_id: catalog::TEMPLATES[0].id.to_string(),
            font_size_hint: 24,
            voice: Voice::Charon,
            include_arabic: true,
            category: catalog::QUOTE_CATEGORIES[0].id.to_string(),
        }
    }
}

impl RenderSettings {
    pub fn template(&self) -> &'static catalog::VideoTemplate {
        catalog::template(&self.template_id)
    }

    pub fn category(&self) -> &'static catalog::QuoteCategory {
        catalog::category(&self.category)
    }
}

/// A finished recording on disk.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CapturedArtifact {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    pub duration_secs: f64,
    pub frame_count: u64,
    /// Narration written next to the video when requested.
    pub narration_path: Option<PathBuf>,
}

/// Download name for an artifact: `AliWisdom_{category}_{unix_millis}.{ext}`.
pub fn artifact_file_name(category: &str, unix_millis: u128, extension: &str) -> String {
    format!("AliWisdom_{category}_{unix_millis}.{extension}")
}

#[cfg(test)]
#[path = "../tests/unit/model.rs"]
mod tests;
