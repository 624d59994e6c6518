//! Remote collaborators: quote generation, stock video search, speech synthesis.
//!
//! The studio depends only on these traits, so tests drive it with in-memory fakes.

use std::future::Future;

use crate::{catalog::Voice, foundation::error::WisdomResult, model::Quote};

pub mod download;
pub mod gemini;
pub mod pexels;

pub use download::download_to;
pub use gemini::GeminiClient;
pub use pexels::PexelsClient;

pub trait QuoteSource {
    /// A quote on `topic_query`. Failures are retried by the caller.
    fn fetch_quote(&self, topic_query: &str) -> impl Future<Output = WisdomResult<Quote>> + Send;
}

pub trait MediaSearch {
    /// URL of a portrait stock video for `query`; `None` when nothing usable was found.
    fn search_background_video(&self, query: &str) -> impl Future<Output = Option<String>> + Send;
}

pub trait NarrationSynthesizer {
    /// Base64-encoded 16-bit mono PCM of `script` read in `voice`.
    fn synthesize(
        &self,
        script: &str,
        voice: Voice,
    ) -> impl Future<Output = WisdomResult<String>> + Send;
}
