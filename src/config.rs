//! Application configuration: a JSON file with every field defaulted, plus environment overrides
//! for credentials and the font directory.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::foundation::error::{WisdomError, WisdomResult};

pub const PRIMARY_FONT_FILE: &str = "Amiri-Regular.ttf";
pub const SECONDARY_FONT_FILE: &str = "NotoNastaliqUrdu-Regular.ttf";
pub const UI_FONT_FILE: &str = "Inter-Regular.ttf";

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub quote_model: String,
    pub tts_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            quote_model: "gemini-3-flash-preview".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PexelsConfig {
    pub api_key: String,
    pub per_page: u32,
}

impl Default for PexelsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            per_page: 15,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontPaths {
    pub primary: PathBuf,
    pub secondary: PathBuf,
    pub ui: PathBuf,
}

impl FontPaths {
    /// The three expected font files inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            primary: dir.join(PRIMARY_FONT_FILE),
            secondary: dir.join(SECONDARY_FONT_FILE),
            ui: dir.join(UI_FONT_FILE),
        }
    }
}

impl Default for FontPaths {
    fn default() -> Self {
        Self::in_dir(Path::new("fonts"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub fps: u32,
    pub video_bitrate: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("out"),
            fps: 30,
            video_bitrate: 8_000_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub pexels: PexelsConfig,
    pub fonts: FontPaths,
    pub output: OutputConfig,
    pub retry_delay_ms: u64,
    pub sample_rate: u32,
    /// Serve a fixed quote when the quote service fails instead of retrying against it.
    pub quote_fallback: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig::default(),
            pexels: PexelsConfig::default(),
            fonts: FontPaths::default(),
            output: OutputConfig::default(),
            retry_delay_ms: 2000,
            sample_rate: crate::media::pcm::NARRATION_SAMPLE_RATE,
            quote_fallback: false,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> WisdomResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| WisdomError::config(format!("read '{}': {e}", path.display())))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> WisdomResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| WisdomError::config(format!("parse config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply environment overrides through `lookup`, so tests need not touch the process env.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")) {
            self.gemini.api_key = key;
        }
        if let Some(key) = non_empty("PEXELS_API_KEY") {
            self.pexels.api_key = key;
        }
        if let Some(dir) = non_empty("ALIWISDOM_FONTS_DIR") {
            self.fonts = FontPaths::in_dir(Path::new(&dir));
        }
    }

    pub fn from_process_env(mut self) -> Self {
        self.apply_env(|k| std::env::var(k).ok());
        self
    }

    pub fn validate(&self) -> WisdomResult<()> {
        if self.output.fps == 0 {
            return Err(WisdomError::config("output.fps must be > 0"));
        }
        if self.output.video_bitrate == 0 {
            return Err(WisdomError::config("output.video_bitrate must be > 0"));
        }
        if self.sample_rate == 0 {
            return Err(WisdomError::config("sample_rate must be > 0"));
        }
        if self.pexels.per_page == 0 {
            return Err(WisdomError::config("pexels.per_page must be > 0"));
        }
        if self.gemini.quote_model.trim().is_empty() || self.gemini.tts_model.trim().is_empty() {
            return Err(WisdomError::config("gemini model names must be non-empty"));
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
