//! Generation Providers
//!
//! Provider abstraction for asynchronous generative-media services. Every
//! provider implements the same two-call protocol — submit a job, then check
//! its status — so the poll loop and the engine stay provider-agnostic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use super::job::{GenerationRequest, JobHandle, MediaKind, PollOutcome};
use super::poll::PollConfig;
use crate::error::CoreResult;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for a generation provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key (if required)
    pub api_key: Option<String>,
    /// Base URL override
    pub base_url: Option<String>,
    /// Per-request HTTP timeout in seconds
    pub timeout_sec: u64,
    /// Model ID to use (provider-specific)
    pub model_id: Option<String>,
    /// Additional provider-specific settings
    pub settings: HashMap<String, serde_json::Value>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout_sec: 60,
            model_id: None,
            settings: HashMap::new(),
        }
    }
}

impl ProviderConfig {
    /// Creates a new config with API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Sets the base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model ID
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Sets a custom setting
    pub fn with_setting<T: Serialize>(mut self, key: impl Into<String>, value: T) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.settings.insert(key.into(), v);
        }
        self
    }

    /// Gets a setting value
    pub fn get_setting<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.settings
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

// =============================================================================
// Provider Trait
// =============================================================================

/// Trait for asynchronous generation providers.
///
/// `submit` owns the request-shape knowledge for its upstream API and maps
/// the submission response to a [`JobHandle`]; `check_status` maps one status
/// payload to a [`PollOutcome`]. URL-finding is delegated to the extractor.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Returns the provider identifier (e.g., "runware")
    fn id(&self) -> &str;

    /// Returns the media kinds this provider can generate
    fn kinds(&self) -> &[MediaKind];

    /// Checks if the provider supports a media kind
    fn supports(&self, kind: MediaKind) -> bool {
        self.kinds().contains(&kind)
    }

    /// Checks if the provider is available (configured correctly)
    fn is_available(&self) -> bool;

    /// Poll loop configuration for a media kind.
    ///
    /// Timeout and backoff constants are provider-owned: upstream job
    /// runtimes differ by an order of magnitude between providers.
    fn poll_config(&self, kind: MediaKind) -> PollConfig;

    /// Submits a generation job and returns a handle for polling
    async fn submit(&self, request: &GenerationRequest) -> CoreResult<JobHandle>;

    /// Checks the status of a submitted job
    async fn check_status(&self, handle: &JobHandle) -> CoreResult<PollOutcome>;
}

// =============================================================================
// Mock Provider for Testing
// =============================================================================

/// Mock provider with scripted outcomes and call counters.
///
/// `check_status` returns the one-shot status error first (if set), then the
/// scripted outcomes in order, then `Pending` forever.
pub struct MockProvider {
    id: String,
    kinds: Vec<MediaKind>,
    available: bool,
    job_id: String,
    poll_config: PollConfig,
    submit_error: Mutex<Option<crate::error::CoreError>>,
    status_error: Mutex<Option<crate::error::CoreError>>,
    outcomes: Mutex<VecDeque<PollOutcome>>,
    submit_calls: AtomicU32,
    status_calls: AtomicU32,
}

impl MockProvider {
    /// Creates a new mock provider
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kinds: vec![MediaKind::Video, MediaKind::Image],
            available: true,
            job_id: ulid::Ulid::new().to_string(),
            poll_config: PollConfig::fixed(10, 1),
            submit_error: Mutex::new(None),
            status_error: Mutex::new(None),
            outcomes: Mutex::new(VecDeque::new()),
            submit_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
        }
    }

    /// Sets the supported media kinds
    pub fn with_kinds(mut self, kinds: Vec<MediaKind>) -> Self {
        self.kinds = kinds;
        self
    }

    /// Sets availability
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Sets the job ID returned from submission
    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = job_id.into();
        self
    }

    /// Sets the poll configuration
    pub fn with_poll_config(mut self, config: PollConfig) -> Self {
        self.poll_config = config;
        self
    }

    /// Scripts the status-check outcomes, consumed in order
    pub fn with_outcomes(self, outcomes: Vec<PollOutcome>) -> Self {
        *self.outcomes.lock().unwrap() = outcomes.into();
        self
    }

    /// Scripts a one-shot error for the first status check
    pub fn with_status_error(self, error: crate::error::CoreError) -> Self {
        *self.status_error.lock().unwrap() = Some(error);
        self
    }

    /// Scripts a one-shot error for the next submission
    pub fn with_submit_error(self, error: crate::error::CoreError) -> Self {
        *self.submit_error.lock().unwrap() = Some(error);
        self
    }

    /// Number of submissions issued
    pub fn submit_call_count(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    /// Number of status checks issued
    pub fn status_call_count(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn kinds(&self) -> &[MediaKind] {
        &self.kinds
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn poll_config(&self, _kind: MediaKind) -> PollConfig {
        self.poll_config
    }

    async fn submit(&self, request: &GenerationRequest) -> CoreResult<JobHandle> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.submit_error.lock().unwrap().take() {
            return Err(error);
        }

        Ok(JobHandle {
            provider: self.id.clone(),
            job_id: self.job_id.clone(),
            kind: request.kind,
            status_url: None,
            submitted_at: chrono::Utc::now().timestamp(),
        })
    }

    async fn check_status(&self, _handle: &JobHandle) -> CoreResult<PollOutcome> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.status_error.lock().unwrap().take() {
            return Err(error);
        }

        Ok(self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PollOutcome::Pending {
                progress: None,
                message: None,
            }))
    }
}

// =============================================================================
// Tests
// =============================================================================
