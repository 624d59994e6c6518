use serde::Deserialize;
use serde_json::json;

use crate::{
    catalog::Voice,
    config::GeminiConfig,
    foundation::error::{WisdomError, WisdomResult},
    model::Quote,
    services::{NarrationSynthesizer, QuoteSource},
};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini `generateContent` client for quotes (JSON schema output) and narration (audio output).
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    key: String,
    quote_model: String,
    tts_model: String,
    fallback: bool,
}

impl GeminiClient {
    pub fn new(cfg: &GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            key: cfg.api_key.clone(),
            quote_model: cfg.quote_model.clone(),
            tts_model: cfg.tts_model.clone(),
            fallback: false,
        }
    }

    /// Answer with [`fallback_quote`] instead of an error when the quote request fails.
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    async fn generate(&self, model: &str, body: serde_json::Value) -> Result<String, String> {
        if self.key.trim().is_empty() {
            return Err("Gemini API key is not configured".to_string());
        }
        let url = format!("{BASE_URL}/{model}:generateContent");
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.key.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Gemini request failed: {e}"))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(format!(
                "Gemini API error ({status}): {}",
                extract_gemini_error(&text).unwrap_or(text)
            ));
        }
        Ok(text)
    }

    async fn request_quote(&self, topic_query: &str) -> WisdomResult<Quote> {
        let text = self
            .generate(&self.quote_model, quote_request_body(topic_query))
            .await
            .map_err(WisdomError::fetch)?;
        parse_quote_response(&text)
    }
}

impl QuoteSource for GeminiClient {
    async fn fetch_quote(&self, topic_query: &str) -> WisdomResult<Quote> {
        match self.request_quote(topic_query).await {
            Ok(quote) => Ok(quote),
            Err(e) if self.fallback => {
                tracing::warn!(error = %e, "quote request failed; serving fallback quote");
                Ok(fallback_quote())
            }
            Err(e) => Err(e),
        }
    }
}

impl NarrationSynthesizer for GeminiClient {
    async fn synthesize(&self, script: &str, voice: Voice) -> WisdomResult<String> {
        let text = self
            .generate(&self.tts_model, narration_request_body(script, voice))
            .await
            .map_err(WisdomError::synthesis)?;
        parse_audio_response(&text)
    }
}

pub fn quote_prompt(topic_query: &str) -> String {
    format!(
        r#"Provide a highly authentic and powerful quote or saying of Hazrat Ali (R.A) related to "{topic_query}".
Sources should preferably be Nahj al-Balagha or other classical Islamic traditions.

Requirements:
1. "arabic": The original Arabic text of the quote (if available).
2. "urdu": A poetic and profound Urdu translation.
3. "narrationScript": A natural Urdu voiceover script.
   - IMPORTANT: If the quote contains a famous Arabic phrase (like "العلم خير من المال"), DO NOT translate it inside the Urdu sentence.
   - The narrator should say the Arabic part with respect and then continue the explanation in Urdu.
   - Example: "حضرت علی علیہ السلام نے فرمایا: [Arabic quote here] یعنی علم مال سے بہتر ہے..."
4. "source": The source book (e.g., Nahj al-Balagha, Sayings of Ali).
5. "category": The theme.

Return ONLY a JSON object."#
    )
}

pub fn narration_prompt(script: &str) -> String {
    format!(
        "You are an eloquent narrator of the wisdom of Hazrat Ali (R.A). \n\
The following script is in Urdu but contains Arabic wisdom phrases.\n\
1. Recite Arabic phrases with profound respect, slow pacing, and clarity.\n\
2. Speak Urdu in a powerful, wisdom-filled, and deep tone.\n\
\n\
Script:\n\
{script}"
    )
}

fn quote_request_body(topic_query: &str) -> serde_json::Value {
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": quote_prompt(topic_query) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "arabic": { "type": "STRING" },
                    "urdu": { "type": "STRING" },
                    "narrationScript": { "type": "STRING" },
                    "source": { "type": "STRING" },
                    "category": { "type": "STRING" }
                },
                "required": ["arabic", "urdu", "narrationScript", "source", "category"]
            }
        }
    })
}

fn narration_request_body(script: &str, voice: Voice) -> serde_json::Value {
    json!({
        "contents": [{ "parts": [{ "text": narration_prompt(script) }] }],
        "generationConfig": {
            "responseModalities": ["AUDIO"],
            "speechConfig": {
                "voiceConfig": {
                    "prebuiltVoiceConfig": { "voiceName": voice.id() }
                }
            }
        }
    })
}

/// The saying served when the quote service is unreachable and fallback is enabled.
pub fn fallback_quote() -> Quote {
    Quote {
        arabic: "اَلْعِلْمُ خَيْرٌ مِنَ الْمَالِ".to_string(),
        urdu: "علم مال سے بہتر ہے، کیونکہ علم تمہاری حفاظت کرتا ہے اور مال کی حفاظت تمہیں کرنی پڑتی ہے۔"
            .to_string(),
        narration_script: "حضرت علی علیہ السلام کا فرمان ہے کہ: اَلْعِلْمُ خَيْرٌ مِنَ الْمَالِ۔ یعنی علم مال سے بہتر ہے، کیونکہ علم تمہاری حفاظت کرتا ہے اور مال کی حفاظت تمہیں کرنی پڑتی ہے۔"
            .to_string(),
        source: "نہج البلاغہ".to_string(),
        category: "Wisdom".to_string(),
    }
}

pub(crate) fn parse_quote_response(text: &str) -> WisdomResult<Quote> {
    let payload: GeminiResponse = serde_json::from_str(text)
        .map_err(|e| WisdomError::fetch(format!("failed to parse Gemini response JSON: {e}")))?;
    let body: String = first_parts(&payload)
        .ok_or_else(|| WisdomError::fetch("no candidate returned from Gemini"))?
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();
    if body.trim().is_empty() {
        return Err(WisdomError::fetch("Gemini returned an empty quote"));
    }

    let quote: Quote = serde_json::from_str(body.trim())
        .map_err(|e| WisdomError::fetch(format!("quote JSON did not match schema: {e}")))?;
    quote
        .validate()
        .map_err(|e| WisdomError::fetch(format!("unusable quote: {e}")))?;
    Ok(quote)
}

pub(crate) fn parse_audio_response(text: &str) -> WisdomResult<String> {
    let payload: GeminiResponse = serde_json::from_str(text)
        .map_err(|e| WisdomError::synthesis(format!("failed to parse Gemini response JSON: {e}")))?;
    first_parts(&payload)
        .and_then(|parts| {
            parts
                .iter()
                .filter_map(|p| p.inline_data.as_ref())
                .map(|d| d.data.clone())
                .find(|d| !d.is_empty())
        })
        .ok_or_else(|| WisdomError::synthesis("response carried no audio payload"))
}

fn first_parts(payload: &GeminiResponse) -> Option<&[GeminiPart]> {
    payload
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|c| c.parts.as_slice())
}

fn extract_gemini_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<GeminiError>,
    }

    #[derive(Deserialize)]
    struct GeminiError {
        message: Option<String>,
        status: Option<String>,
        code: Option<i32>,
    }

    let error = serde_json::from_str::<ErrorBody>(body).ok()?.error?;
    let mut parts = Vec::new();
    if let Some(message) = error.message.filter(|m| !m.trim().is_empty()) {
        parts.push(message);
    }
    if let Some(status) = error.status.filter(|s| !s.trim().is_empty()) {
        parts.push(format!("type: {status}"));
    }
    if let Some(code) = error.code {
        parts.push(format!("code: {code}"));
    }
    Some(if parts.is_empty() {
        "unknown error".to_string()
    } else {
        parts.join(" | ")
    })
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}

#[cfg(test)]
#[path = "../../tests/unit/services/gemini.rs"]
mod tests;
