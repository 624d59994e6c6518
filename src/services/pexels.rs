use std::time::{SystemTime, UNIX_EPOCH};

use serde::Deserialize;

use crate::{
    config::PexelsConfig,
    foundation::error::{WisdomError, WisdomResult},
    services::MediaSearch,
};

const SEARCH_URL: &str = "https://api.pexels.com/videos/search";
const MIN_FILE_WIDTH: u32 = 720;
const MAX_FILE_WIDTH: u32 = 1080;

/// Pexels video search restricted to portrait clips.
#[derive(Debug, Clone)]
pub struct PexelsClient {
    http: reqwest::Client,
    key: String,
    per_page: u32,
}

impl PexelsClient {
    pub fn new(cfg: &PexelsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            key: cfg.api_key.clone(),
            per_page: cfg.per_page,
        }
    }

    async fn search(&self, query: &str) -> WisdomResult<Option<String>> {
        if self.key.trim().is_empty() {
            return Err(WisdomError::config("Pexels API key is not configured"));
        }
        let per_page = self.per_page.to_string();
        let url = reqwest::Url::parse_with_params(
            SEARCH_URL,
            [
                ("query", query),
                ("orientation", "portrait"),
                ("per_page", per_page.as_str()),
            ],
        )
        .map_err(|e| WisdomError::fetch(format!("bad search url: {e}")))?;

        let response = self
            .http
            .get(url)
            .header("Authorization", self.key.clone())
            .send()
            .await
            .map_err(|e| WisdomError::fetch(format!("Pexels request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(WisdomError::fetch(format!("Pexels fetch failed ({status})")));
        }
        let text = response
            .text()
            .await
            .map_err(|e| WisdomError::fetch(format!("Pexels body: {e}")))?;
        let parsed: SearchResponse = serde_json::from_str(&text)
            .map_err(|e| WisdomError::fetch(format!("failed to parse Pexels response: {e}")))?;
        Ok(pick_video_link(&parsed, random_seed()))
    }
}

impl MediaSearch for PexelsClient {
    async fn search_background_video(&self, query: &str) -> Option<String> {
        match self.search(query).await {
            Ok(link) => {
                if link.is_none() {
                    tracing::info!(query, "no background video found");
                }
                link
            }
            Err(e) => {
                tracing::warn!(error = %e, query, "background video search failed");
                None
            }
        }
    }
}

fn random_seed() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as usize)
        .unwrap_or_default()
}

/// Video `seed % len`, then its first file in the 720..=1080 width band, else its first file.
pub(crate) fn pick_video_link(response: &SearchResponse, seed: usize) -> Option<String> {
    if response.videos.is_empty() {
        return None;
    }
    let video = &response.videos[seed % response.videos.len()];
    video
        .video_files
        .iter()
        .find(|f| f.width.is_some_and(|w| (MIN_FILE_WIDTH..=MAX_FILE_WIDTH).contains(&w)))
        .or_else(|| video.video_files.first())
        .map(|f| f.link.clone())
        .filter(|link| !link.is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    videos: Vec<PexelsVideo>,
}

#[derive(Debug, Deserialize)]
struct PexelsVideo {
    #[serde(default)]
    video_files: Vec<VideoFile>,
}

#[derive(Debug, Deserialize)]
struct VideoFile {
    width: Option<u32>,
    #[serde(default)]
    link: String,
}

#[cfg(test)]
#[path = "../../tests/unit/services/pexels.rs"]
mod tests;
