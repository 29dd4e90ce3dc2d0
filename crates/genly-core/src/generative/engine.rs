//! Generation Engine
//!
//! Public entry point for the generation core. Holds the provider registry,
//! validates requests, performs submission, drives the poll loop with the
//! adapter's own configuration, and assembles the normalized result.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::job::{GenerationRequest, MediaKind, NormalizedResult};
use super::poll::{CancelToken, PollEventSink, PollLoop, ProgressCallback};
use super::providers::GenerationProvider;
use crate::error::{CoreError, CoreResult};

// =============================================================================
// Options
// =============================================================================

/// Per-call options: observability hooks and cancellation
#[derive(Default)]
pub struct GenerateOptions {
    /// Callback receiving a 0-100 progress estimate
    pub progress: Option<ProgressCallback>,
    /// Sink receiving one diagnostic event per poll iteration
    pub events: Option<PollEventSink>,
    /// External cancellation token
    pub cancel: Option<CancelToken>,
}

impl GenerateOptions {
    /// Creates empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a progress callback
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Attaches a poll event sink
    pub fn with_event_sink(mut self, sink: PollEventSink) -> Self {
        self.events = Some(sink);
        self
    }

    /// Attaches a cancellation token
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

// =============================================================================
// Provider Listing
// =============================================================================

/// Summary of a registered provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider identifier
    pub id: String,
    /// Media kinds the provider can generate
    pub kinds: Vec<MediaKind>,
    /// Whether the provider is configured and usable
    pub available: bool,
}

// =============================================================================
// GenerationEngine
// =============================================================================

/// Orchestrator over the registered generation providers.
///
/// Providers register at construction time; afterwards the engine is shared
/// immutably, so concurrent `generate` calls need no locking.
pub struct GenerationEngine {
    providers: HashMap<String, Arc<dyn GenerationProvider>>,
}

impl GenerationEngine {
    /// Creates an engine with no providers registered
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Registers a provider under its own ID
    pub fn register(&mut self, provider: Arc<dyn GenerationProvider>) {
        self.providers.insert(provider.id().to_string(), provider);
    }

    /// Gets a provider by ID
    pub fn provider(&self, id: &str) -> Option<&Arc<dyn GenerationProvider>> {
        self.providers.get(id)
    }

    /// Lists registered provider IDs, sorted
    pub fn provider_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Lists registered providers with their kinds and availability
    pub fn providers(&self) -> Vec<ProviderInfo> {
        let mut infos: Vec<ProviderInfo> = self
            .providers
            .values()
            .map(|p| ProviderInfo {
                id: p.id().to_string(),
                kinds: p.kinds().to_vec(),
                available: p.is_available(),
            })
            .collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }

    /// Generates media with the given provider
    pub async fn generate(
        &self,
        provider_id: &str,
        request: GenerationRequest,
    ) -> CoreResult<NormalizedResult> {
        self.generate_with_options(provider_id, request, GenerateOptions::default())
            .await
    }

    /// Generates media with per-call options.
    ///
    /// Validation failures surface before any network call. Classified
    /// errors from submission and polling propagate unchanged.
    pub async fn generate_with_options(
        &self,
        provider_id: &str,
        request: GenerationRequest,
        options: GenerateOptions,
    ) -> CoreResult<NormalizedResult> {
        request.validate().map_err(CoreError::InvalidRequest)?;

        let provider = self
            .providers
            .get(provider_id)
            .ok_or_else(|| CoreError::UnknownProvider(provider_id.to_string()))?;

        if !provider.supports(request.kind) {
            return Err(CoreError::InvalidRequest(format!(
                "Provider '{}' does not support {} generation",
                provider_id, request.kind
            )));
        }

        let started = Instant::now();
        info!(
            "Generation starting: provider={} kind={}",
            provider_id, request.kind
        );

        let handle = provider.submit(&request).await?;

        let mut poll = PollLoop::new(provider.poll_config(request.kind));
        if let Some(callback) = options.progress {
            poll = poll.with_progress(callback);
        }
        if let Some(sink) = options.events {
            poll = poll.with_event_sink(sink);
        }
        if let Some(token) = options.cancel {
            poll = poll.with_cancel_token(token);
        }

        let completion = poll.run(provider.as_ref(), &handle).await?;

        Ok(NormalizedResult {
            media_url: completion.media_url,
            job_id: handle.job_id,
            provider: handle.provider,
            kind: request.kind,
            duration_sec: request.duration_sec,
            aspect_ratio: request.aspect_ratio,
            generation_time_ms: started.elapsed().as_millis() as u64,
        })
    }
}

impl Default for GenerationEngine {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generative::job::PollOutcome;
    use crate::generative::poll::PollConfig;
    use crate::generative::providers::MockProvider;
    use std::sync::Mutex;

    fn engine_with(provider: Arc<MockProvider>) -> GenerationEngine {
        let mut engine = GenerationEngine::new();
        engine.register(provider);
        engine
    }

    fn fast_mock(id: &str) -> MockProvider {
        MockProvider::new(id).with_poll_config(PollConfig::fixed(5, 1))
    }

    fn pending() -> PollOutcome {
        PollOutcome::Pending {
            progress: None,
            message: None,
        }
    }

    // =========================================================================
    // Registry Tests
    // =========================================================================

    #[test]
    fn test_register_and_list() {
        let mut engine = GenerationEngine::new();
        engine.register(Arc::new(MockProvider::new("beta")));
        engine.register(Arc::new(
            MockProvider::new("alpha").with_available(false),
        ));

        assert_eq!(engine.provider_ids(), vec!["alpha", "beta"]);

        let infos = engine.providers();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].id, "alpha");
        assert!(!infos[0].available);
        assert!(infos[1].available);
    }

    #[tokio::test]
    async fn test_unknown_provider() {
        let engine = GenerationEngine::new();
        let error = engine
            .generate("nope", GenerationRequest::new("A sunset"))
            .await
            .unwrap_err();
        match error {
            CoreError::UnknownProvider(id) => assert_eq!(id, "nope"),
            other => panic!("Expected unknown provider, got {:?}", other),
        }
    }

    // =========================================================================
    // Validation Tests
    // =========================================================================

    #[tokio::test]
    async fn test_empty_prompt_fails_before_any_network_call() {
        let provider = Arc::new(fast_mock("mock"));
        let engine = engine_with(provider.clone());

        let error = engine
            .generate("mock", GenerationRequest::new("   "))
            .await
            .unwrap_err();

        assert!(matches!(error, CoreError::InvalidRequest(_)));
        assert_eq!(provider.submit_call_count(), 0);
        assert_eq!(provider.status_call_count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_kind_is_invalid_request() {
        let provider = Arc::new(fast_mock("video-only").with_kinds(vec![MediaKind::Video]));
        let engine = engine_with(provider.clone());

        let request = GenerationRequest::new("A fox").with_kind(MediaKind::Image);
        let error = engine.generate("video-only", request).await.unwrap_err();

        assert!(matches!(error, CoreError::InvalidRequest(_)));
        assert_eq!(provider.submit_call_count(), 0);
    }

    // =========================================================================
    // End-to-End Tests
    // =========================================================================

    #[tokio::test]
    async fn test_generate_end_to_end() {
        let provider = Arc::new(fast_mock("mock").with_job_id("job-1").with_outcomes(vec![
            pending(),
            PollOutcome::Completed {
                media_url: "https://cdn.example.com/v.mp4".to_string(),
            },
        ]));
        let engine = engine_with(provider.clone());

        let request = GenerationRequest::new("A sunset over the ocean")
            .with_duration(10.0)
            .with_aspect_ratio("16:9");
        let result = engine.generate("mock", request).await.unwrap();

        assert_eq!(result.media_url, "https://cdn.example.com/v.mp4");
        assert_eq!(result.job_id, "job-1");
        assert_eq!(result.provider, "mock");
        assert_eq!(result.kind, MediaKind::Video);
        assert_eq!(result.duration_sec, Some(10.0));
        assert_eq!(result.aspect_ratio, Some("16:9".to_string()));
        assert_eq!(provider.submit_call_count(), 1);
        assert_eq!(provider.status_call_count(), 2);
    }

    #[tokio::test]
    async fn test_submission_error_propagates_unchanged() {
        let provider = Arc::new(fast_mock("mock").with_submit_error(CoreError::Submission {
            status: 400,
            body: "prompt rejected".to_string(),
        }));
        let engine = engine_with(provider.clone());

        let error = engine
            .generate("mock", GenerationRequest::new("A sunset"))
            .await
            .unwrap_err();

        match error {
            CoreError::Submission { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("prompt rejected"));
            }
            other => panic!("Expected submission error, got {:?}", other),
        }
        assert_eq!(provider.status_call_count(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let provider = Arc::new(fast_mock("mock").with_outcomes(vec![PollOutcome::Failed {
            message: "content policy violation".to_string(),
        }]));
        let engine = engine_with(provider);

        let error = engine
            .generate("mock", GenerationRequest::new("A sunset"))
            .await
            .unwrap_err();

        assert!(matches!(error, CoreError::GenerationFailed(_)));
    }

    #[tokio::test]
    async fn test_all_pending_times_out() {
        let provider = Arc::new(
            MockProvider::new("mock").with_poll_config(PollConfig::fixed(3, 1)),
        );
        let engine = engine_with(provider.clone());

        let error = engine
            .generate("mock", GenerationRequest::new("A sunset"))
            .await
            .unwrap_err();

        match error {
            CoreError::Timeout { attempts } => assert_eq!(attempts, 3),
            other => panic!("Expected timeout, got {:?}", other),
        }
        assert_eq!(provider.status_call_count(), 3);
    }

    #[tokio::test]
    async fn test_generate_with_options_progress_and_cancel() {
        let provider = Arc::new(fast_mock("mock").with_outcomes(vec![
            pending(),
            pending(),
            PollOutcome::Completed {
                media_url: "https://cdn.example.com/v.mp4".to_string(),
            },
        ]));
        let engine = engine_with(provider.clone());

        let token = CancelToken::new();
        let trigger = token.clone();
        let reported: Arc<Mutex<Vec<f64>>> = Arc::new(Mutex::new(Vec::new()));
        let progress_log = reported.clone();

        // Cancel once the second poll attempt is observed
        let error = engine
            .generate_with_options(
                "mock",
                GenerationRequest::new("A sunset"),
                GenerateOptions::new()
                    .with_progress(Box::new(move |pct| {
                        progress_log.lock().unwrap().push(pct);
                    }))
                    .with_event_sink(Box::new(move |event| {
                        if event.attempt == 2 {
                            trigger.cancel();
                        }
                    }))
                    .with_cancel_token(token),
            )
            .await
            .unwrap_err();

        assert!(matches!(error, CoreError::Cancelled));
        assert_eq!(provider.status_call_count(), 2);
        assert!(!reported.lock().unwrap().is_empty());
    }
}
