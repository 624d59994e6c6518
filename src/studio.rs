//! The orchestrator: owns quote, background, settings and status, and sequences the remote calls
//! and the capture cycle.
//!
//! Every cycle takes `&mut self`, so two fetches or a fetch and a production can never overlap.

use std::time::Duration;

use crate::{
    capture::{
        pipeline::{CaptureEvent, CapturePipeline, FrameRenderer},
        recorder::MediaRecorder,
    },
    catalog,
    foundation::error::WisdomResult,
    media::{audio_context::AudioContextSlot, video::BackgroundSource},
    model::{CapturedArtifact, Quote, RenderSettings},
    services::{MediaSearch, NarrationSynthesizer, QuoteSource},
    status::{GenerationStatus, StatusEvent},
};

pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(2000);

type StatusObserver = Box<dyn FnMut(&GenerationStatus)>;

pub struct Studio<Q, M, N> {
    quotes: Q,
    media: M,
    narrator: N,
    settings: RenderSettings,
    status: GenerationStatus,
    quote: Option<Quote>,
    background_url: Option<String>,
    artifact: Option<CapturedArtifact>,
    retry_delay: Duration,
    observer: Option<StatusObserver>,
}

impl<Q, M, N> Studio<Q, M, N>
where
    Q: QuoteSource,
    M: MediaSearch,
    N: NarrationSynthesizer,
{
    pub fn new(quotes: Q, media: M, narrator: N) -> Self {
        Self {
            quotes,
            media,
            narrator,
            settings: RenderSettings::default(),
            status: GenerationStatus::idle(),
            quote: None,
            background_url: None,
            artifact: None,
            retry_delay: DEFAULT_RETRY_DELAY,
            observer: None,
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Called with the new status after every transition.
    pub fn on_status(mut self, observer: impl FnMut(&GenerationStatus) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn status(&self) -> &GenerationStatus {
        &self.status
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    pub fn quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }

    pub fn background_url(&self) -> Option<&str> {
        self.background_url.as_deref()
    }

    pub fn artifact(&self) -> Option<&CapturedArtifact> {
        self.artifact.as_ref()
    }

    fn transition(&mut self, event: StatusEvent) -> WisdomResult<()> {
        let next = self.status.apply(event)?;
        if next != self.status {
            tracing::info!(
                phase = ?next.phase,
                progress = next.progress,
                message = %next.message,
                "status"
            );
            self.status = next;
            if let Some(observer) = self.observer.as_mut() {
                observer(&self.status);
            }
        }
        Ok(())
    }

    /// Fetch a quote for `category_override` (or the selected category), retrying after a fixed
    /// delay until the quote service answers, then look up a background video for it.
    ///
    /// Errors only when the current status does not permit a fetch.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_quote(&mut self, category_override: Option<&str>) -> WisdomResult<()> {
        let selected = category_override.unwrap_or(self.settings.category.as_str());
        let category = catalog::category(selected);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            self.transition(StatusEvent::BeginFetch)?;
            self.artifact = None;
            self.background_url = None;

            match self.quotes.fetch_quote(category.query).await {
                Ok(quote) => {
                    tracing::info!(attempt, source = %quote.source, "quote received");
                    self.quote = Some(quote);
                    self.background_url = self
                        .media
                        .search_background_video(&catalog::background_query(category.id))
                        .await;
                    return self.transition(StatusEvent::FetchSucceeded);
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        error = %e,
                        transient = e.is_transient(),
                        delay_ms = self.retry_delay.as_millis() as u64,
                        "quote fetch failed; retrying"
                    );
                    self.transition(StatusEvent::FetchFailed)?;
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }

    /// Select `category_id` and fetch a fresh quote for it.
    pub async fn change_category(&mut self, category_id: &str) -> WisdomResult<()> {
        self.settings.category = category_id.to_string();
        self.fetch_quote(None).await
    }

    /// Use a quote supplied by the caller instead of fetching one.
    pub fn set_quote(&mut self, quote: Quote) -> WisdomResult<()> {
        quote.validate()?;
        self.quote = Some(quote);
        self.artifact = None;
        Ok(())
    }

    /// Look up a background video for the selected category without touching the quote.
    pub async fn refresh_background(&mut self) -> Option<&str> {
        let query = catalog::background_query(catalog::category(&self.settings.category).id);
        self.background_url = self.media.search_background_video(&query).await;
        self.background_url.as_deref()
    }

    /// Run one production cycle: synthesize narration, then record it over the composited frames.
    ///
    /// Does nothing unless the studio is idle and holds a quote. Failures end in the error status
    /// rather than an `Err`; the returned artifact is `None` in both cases.
    #[tracing::instrument(skip_all)]
    pub async fn produce<R, C>(
        &mut self,
        pipeline: &mut CapturePipeline<R, C>,
        background: Option<&mut dyn BackgroundSource>,
        audio: &mut AudioContextSlot,
    ) -> Option<&CapturedArtifact>
    where
        R: FrameRenderer,
        C: MediaRecorder,
    {
        if !self.status.is_idle() {
            tracing::debug!(phase = ?self.status.phase, "produce ignored while not idle");
            return None;
        }
        let quote = self.quote.clone()?;
        let settings = self.settings.clone();

        if let Err(e) = self.transition(StatusEvent::BeginProduction) {
            tracing::warn!(error = %e, "cannot begin production");
            return None;
        }

        match self.run_production(pipeline, &quote, &settings, background, audio).await {
            Ok(artifact) => {
                self.artifact = Some(artifact);
                self.apply_or_warn(StatusEvent::Captured);
                self.artifact.as_ref()
            }
            Err(e) => {
                tracing::error!(error = %e, "production failed");
                self.apply_or_warn(StatusEvent::ProductionFailed {
                    message: e.to_string(),
                });
                None
            }
        }
    }

    async fn run_production<R, C>(
        &mut self,
        pipeline: &mut CapturePipeline<R, C>,
        quote: &Quote,
        settings: &RenderSettings,
        background: Option<&mut dyn BackgroundSource>,
        audio: &mut AudioContextSlot,
    ) -> WisdomResult<CapturedArtifact>
    where
        R: FrameRenderer,
        C: MediaRecorder,
    {
        let narration = self
            .narrator
            .synthesize(&quote.narration_script, settings.voice)
            .await?;
        self.transition(StatusEvent::NarrationReady)?;

        pipeline.produce(quote, settings, &narration, background, audio, &mut |event| {
            match event {
                CaptureEvent::NarrationDecoded { duration_secs } => {
                    tracing::debug!(duration_secs, "narration ready for capture");
                }
                CaptureEvent::Progress(p) => self.apply_or_warn(StatusEvent::Progress(p)),
            }
        })
    }

    /// Acknowledge a finished or failed cycle.
    pub fn dismiss(&mut self) -> WisdomResult<()> {
        self.transition(StatusEvent::Dismiss)
    }

    fn apply_or_warn(&mut self, event: StatusEvent) {
        if let Err(e) = self.transition(event) {
            tracing::warn!(error = %e, "status update dropped");
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/studio.rs"]
mod tests;
