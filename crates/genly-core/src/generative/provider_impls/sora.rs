//! Sora 2 Video Generation Provider
//!
//! Adapter for Sora 2 video generation through CometAPI. Submission goes to
//! the CometAPI task endpoint; results are fetched from the asyncdata source
//! endpoint, whose body is arbitrary text or JSON — completion detection is
//! fully delegated to the media URL extractor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::generative::extract::MediaUrlExtractor;
use crate::generative::job::{GenerationRequest, JobHandle, MediaKind, PollOutcome};
use crate::generative::poll::PollConfig;
use crate::generative::providers::{GenerationProvider, ProviderConfig};

// =============================================================================
// Constants
// =============================================================================

/// Default base URL for CometAPI
const DEFAULT_BASE_URL: &str = "https://api.cometapi.com";

/// Async result source endpoint
const ASYNC_SOURCE_BASE: &str = "https://asyncdata.net/source";

/// Model ID
const MODEL_ID: &str = "sora2-normal";

/// Durations the model supports, in seconds
const SUPPORTED_DURATIONS: [f64; 2] = [5.0, 10.0];

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreateVideoRequest {
    prompt: String,
    model: String,
    duration: u32,
    enhance_prompt: bool,
    width: u32,
    height: u32,
    aspect_ratio: String,
}

#[derive(Debug, Deserialize)]
struct CreateVideoResponse {
    #[serde(default)]
    id: Option<String>,
}

// =============================================================================
// Sora2Provider
// =============================================================================

/// Sora 2 video generation provider (CometAPI)
pub struct Sora2Provider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model_id: String,
}

impl std::fmt::Debug for Sora2Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sora2Provider")
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .finish_non_exhaustive()
    }
}

impl Sora2Provider {
    /// Create a new Sora 2 provider with default configuration
    pub fn new(api_key: impl Into<String>) -> CoreResult<Self> {
        Self::from_config(&ProviderConfig::with_api_key(api_key))
    }

    /// Create a provider from a full configuration (base URL, timeout, model)
    pub fn from_config(config: &ProviderConfig) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_sec))
            .build()
            .map_err(|e| CoreError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().unwrap_or_default(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model_id: config
                .model_id
                .clone()
                .unwrap_or_else(|| MODEL_ID.to_string()),
        })
    }

    /// Set custom base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn submit_url(&self) -> String {
        format!("{}/sora/v1/video/create", self.base_url)
    }

    fn status_url(job_id: &str) -> String {
        format!("{}/{}", ASYNC_SOURCE_BASE, job_id)
    }

    /// Snap a requested duration to the supported set {5, 10}
    fn snap_duration(requested: Option<f64>) -> u32 {
        let requested = requested.unwrap_or(10.0);
        let midpoint = (SUPPORTED_DURATIONS[0] + SUPPORTED_DURATIONS[1]) / 2.0;
        if requested >= midpoint {
            10
        } else {
            5
        }
    }

    /// 1080p-tier dimensions for an aspect ratio
    fn dimensions(aspect_ratio: &str) -> (u32, u32) {
        match aspect_ratio {
            "9:16" | "3:4" => (1080, 1920),
            "1:1" => (1080, 1080),
            _ => (1920, 1080),
        }
    }

    /// Classify an asyncdata payload: explicit failure JSON is terminal,
    /// otherwise the extractor decides completed vs pending.
    fn classify_payload(body: &str) -> PollOutcome {
        if let Ok(value) = serde_json::from_str::<Value>(body) {
            let status = value
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_ascii_lowercase();
            if matches!(status.as_str(), "failed" | "error" | "errored") {
                return PollOutcome::Failed {
                    message: value
                        .get("error")
                        .or_else(|| value.get("message"))
                        .and_then(Value::as_str)
                        .unwrap_or("Upstream reported generation failure")
                        .to_string(),
                };
            }
        }

        match MediaUrlExtractor::new(MediaKind::Video).extract(body) {
            Some(media_url) => PollOutcome::Completed { media_url },
            None => PollOutcome::Pending {
                progress: None,
                message: None,
            },
        }
    }
}

#[async_trait]
impl GenerationProvider for Sora2Provider {
    fn id(&self) -> &str {
        "sora2"
    }

    fn kinds(&self) -> &[MediaKind] {
        &[MediaKind::Video]
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn poll_config(&self, _kind: MediaKind) -> PollConfig {
        // Fixed 5s interval, 15 min budget
        PollConfig::fixed(180, 5000)
    }

    async fn submit(&self, request: &GenerationRequest) -> CoreResult<JobHandle> {
        if !request.reference_media.is_empty() {
            return Err(CoreError::InvalidRequest(
                "Sora 2 does not accept reference media".to_string(),
            ));
        }

        let aspect_ratio = request.aspect_ratio.clone().unwrap_or_else(|| "16:9".to_string());
        let (width, height) = Self::dimensions(&aspect_ratio);
        let body = CreateVideoRequest {
            prompt: request.prompt.clone(),
            model: self.model_id.clone(),
            duration: Self::snap_duration(request.duration_sec),
            enhance_prompt: true,
            width,
            height,
            aspect_ratio,
        };

        debug!(
            "Sora2 submit: duration={} aspect_ratio={}",
            body.duration, body.aspect_ratio
        );

        let response = self
            .client
            .post(self.submit_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::Internal(format!("Sora2 submission network error: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to read Sora2 response: {}", e)))?;

        if !status.is_success() {
            return Err(CoreError::Submission {
                status: status.as_u16(),
                body: text.chars().take(500).collect(),
            });
        }

        let parsed: CreateVideoResponse =
            serde_json::from_str(&text).unwrap_or(CreateVideoResponse { id: None });
        let job_id = parsed.id.ok_or_else(|| CoreError::Submission {
            status: status.as_u16(),
            body: format!("Response missing task id: {}", text.chars().take(200).collect::<String>()),
        })?;

        info!("Sora2 video generation submitted: job_id={}", job_id);

        Ok(JobHandle {
            provider: self.id().to_string(),
            status_url: Some(Self::status_url(&job_id)),
            job_id,
            kind: MediaKind::Video,
            submitted_at: chrono::Utc::now().timestamp(),
        })
    }

    async fn check_status(&self, handle: &JobHandle) -> CoreResult<PollOutcome> {
        let url = handle
            .status_url
            .clone()
            .unwrap_or_else(|| Self::status_url(&handle.job_id));

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| CoreError::TransientPoll(format!("Sora2 poll network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::TransientPoll(format!(
                "Sora2 poll returned {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CoreError::TransientPoll(format!("Failed to read poll body: {}", e)))?;

        debug!(
            "Sora2 poll for job {}: body_len={}",
            handle.job_id,
            body.len()
        );

        Ok(Self::classify_payload(&body))
    }
}

// =============================================================================
// Tests
// =============================================================================
