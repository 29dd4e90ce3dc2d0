//! Generation Job Types
//!
//! Data models for the async generation lifecycle: request parameters,
//! job handles, per-poll outcomes, and the normalized result returned
//! to callers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Media Kind
// =============================================================================

/// Kind of media being generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Video generation
    Video,
    /// Still image generation
    Image,
}

impl MediaKind {
    /// File extensions accepted for this kind of media
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Video => &["mp4", "webm", "mov"],
            MediaKind::Image => &["png", "jpg", "jpeg", "webp"],
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Image => write!(f, "image"),
        }
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "video" => Ok(MediaKind::Video),
            "image" => Ok(MediaKind::Image),
            other => Err(format!("Unknown media kind: {}", other)),
        }
    }
}

// =============================================================================
// Generation Request
// =============================================================================

/// Parameters for a media generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Text prompt describing the desired media
    pub prompt: String,
    /// Kind of media to generate
    pub kind: MediaKind,
    /// Reference media URIs (provider-defined limits, max 9)
    #[serde(default)]
    pub reference_media: Vec<String>,
    /// Style preset identifier (e.g., "anime", "cyberpunk")
    pub style: Option<String>,
    /// Desired duration in seconds (video only, provider-snapped)
    pub duration_sec: Option<f64>,
    /// Aspect ratio (e.g., "16:9", "9:16", "1:1")
    pub aspect_ratio: Option<String>,
    /// Additional provider-specific settings
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
}

impl GenerationRequest {
    /// Create a new video generation request with defaults
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            kind: MediaKind::Video,
            reference_media: Vec::new(),
            style: None,
            duration_sec: None,
            aspect_ratio: None,
            settings: HashMap::new(),
        }
    }

    /// Set the media kind
    pub fn with_kind(mut self, kind: MediaKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the style preset
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Set the desired duration in seconds
    pub fn with_duration(mut self, duration_sec: f64) -> Self {
        self.duration_sec = Some(duration_sec);
        self
    }

    /// Set the aspect ratio
    pub fn with_aspect_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(ratio.into());
        self
    }

    /// Add a reference media URI
    pub fn with_reference_media(mut self, uri: impl Into<String>) -> Self {
        self.reference_media.push(uri.into());
        self
    }

    /// Set a provider-specific setting
    pub fn with_setting<T: Serialize>(mut self, key: impl Into<String>, value: T) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.settings.insert(key.into(), v);
        }
        self
    }

    /// Get a provider-specific setting value
    pub fn get_setting<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.settings
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Validate parameters
    pub fn validate(&self) -> Result<(), String> {
        // Prompt validation
        let trimmed = self.prompt.trim();
        if trimmed.is_empty() {
            return Err("Prompt cannot be empty".to_string());
        }
        if trimmed.len() > 4096 {
            return Err("Prompt too long (max 4096 characters)".to_string());
        }

        // Duration validation (provider-specific snapping happens later)
        if let Some(duration) = self.duration_sec {
            if !duration.is_finite() || duration <= 0.0 {
                return Err(format!("Invalid duration: {}s", duration));
            }
            if duration > 120.0 {
                return Err(format!(
                    "Duration too long: {:.1}s (maximum 120s)",
                    duration
                ));
            }
        }

        // Reference media limits
        if self.reference_media.len() > 9 {
            return Err(format!(
                "Too many reference media entries: {} (max 9)",
                self.reference_media.len()
            ));
        }
        if self.reference_media.iter().any(|uri| uri.trim().is_empty()) {
            return Err("Reference media URI cannot be empty".to_string());
        }

        // Aspect ratio validation
        if let Some(ratio) = &self.aspect_ratio {
            let valid_ratios = ["16:9", "9:16", "1:1", "4:3", "3:4", "21:9"];
            if !valid_ratios.contains(&ratio.as_str()) {
                return Err(format!(
                    "Invalid aspect ratio '{}'. Valid: {}",
                    ratio,
                    valid_ratios.join(", ")
                ));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Job Handle & Poll Outcome
// =============================================================================

/// Handle for tracking a submitted generation job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobHandle {
    /// Provider identifier (e.g., "runware")
    pub provider: String,
    /// Provider-assigned or client-generated job ID
    pub job_id: String,
    /// Kind of media being generated
    pub kind: MediaKind,
    /// Status-check URL, when the provider supplies one
    pub status_url: Option<String>,
    /// Unix timestamp when submitted
    pub submitted_at: i64,
}

/// Outcome of a single status check
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PollOutcome {
    /// Job has not finished yet
    Pending {
        progress: Option<f64>,
        message: Option<String>,
    },
    /// Job completed with a downloadable media URL
    Completed { media_url: String },
    /// Upstream explicitly reported failure
    Failed { message: String },
}

impl PollOutcome {
    /// Whether the outcome is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollOutcome::Completed { .. } | PollOutcome::Failed { .. }
        )
    }
}

// =============================================================================
// Normalized Result
// =============================================================================

/// Provider-agnostic success payload returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedResult {
    /// Absolute http(s) URL of the generated media
    pub media_url: String,
    /// Job identifier the result was produced under
    pub job_id: String,
    /// Provider identifier
    pub provider: String,
    /// Kind of media generated
    pub kind: MediaKind,
    /// Requested duration, echoed from the request
    pub duration_sec: Option<f64>,
    /// Requested aspect ratio, echoed from the request
    pub aspect_ratio: Option<String>,
    /// Wall-clock time from submission to completion in milliseconds
    pub generation_time_ms: u64,
}

// =============================================================================
// Tests
// =============================================================================
