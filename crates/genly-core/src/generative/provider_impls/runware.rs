//! Runware Generation Provider
//!
//! Adapter for the Runware v1 task API: a JSON-array protocol where every
//! call carries a list of task objects keyed by a client-generated task UUID.
//! Video generation runs the PixVerse model with effect/style settings;
//! image generation runs a Gemini image model. Both are submitted with
//! `deliveryMethod: async` and polled with `getResponse` tasks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult};
use crate::generative::effects::{effect_by_id, StylePreset};
use crate::generative::extract::MediaUrlExtractor;
use crate::generative::job::{GenerationRequest, JobHandle, MediaKind, PollOutcome};
use crate::generative::poll::PollConfig;
use crate::generative::providers::{GenerationProvider, ProviderConfig};

// =============================================================================
// Constants
// =============================================================================

/// Default base URL for the Runware task API
const DEFAULT_BASE_URL: &str = "https://api.runware.ai/v1";

/// PixVerse video model ID
const VIDEO_MODEL: &str = "pixverse:1@5";

/// Gemini image model ID
const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// The only duration PixVerse supports, in seconds
const VIDEO_DURATION_SEC: u32 = 5;

/// Settings keys read from the request's open settings map
const SETTING_EFFECT: &str = "effect";
const SETTING_CAMERA_MOVEMENT: &str = "camera_movement";
const SETTING_MOTION_MODE: &str = "motion_mode";
const SETTING_SOUND_EFFECT_SWITCH: &str = "sound_effect_switch";
const SETTING_SOUND_EFFECT_CONTENT: &str = "sound_effect_content";

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InferenceTask {
    task_type: String,
    #[serde(rename = "taskUUID")]
    task_uuid: String,
    model: String,
    positive_prompt: String,
    width: u32,
    height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u32>,
    output_format: String,
    delivery_method: String,
    output_type: String,
    include_cost: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    frame_images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider_settings: Option<ProviderSettings>,
}

#[derive(Debug, Serialize)]
struct ProviderSettings {
    pixverse: PixverseSettings,
}

#[derive(Debug, Default, Serialize)]
struct PixverseSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    effect: Option<String>,
    #[serde(rename = "cameraMovement", skip_serializing_if = "Option::is_none")]
    camera_movement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    motionmode: Option<String>,
    #[serde(rename = "soundEffectSwitch", skip_serializing_if = "Option::is_none")]
    sound_effect_switch: Option<bool>,
    #[serde(rename = "soundEffectContent", skip_serializing_if = "Option::is_none")]
    sound_effect_content: Option<String>,
}

impl PixverseSettings {
    fn is_empty(&self) -> bool {
        self.effect.is_none()
            && self.camera_movement.is_none()
            && self.style.is_none()
            && self.motionmode.is_none()
            && self.sound_effect_switch.is_none()
            && self.sound_effect_content.is_none()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusTask {
    task_type: String,
    #[serde(rename = "taskUUID")]
    task_uuid: String,
}

#[derive(Debug, Deserialize)]
struct TaskEnvelope {
    #[serde(default)]
    errors: Vec<TaskError>,
}

#[derive(Debug, Deserialize)]
struct TaskError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl TaskError {
    fn message(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "Unknown Runware task error".to_string())
    }
}

// =============================================================================
// RunwareProvider
// =============================================================================

/// Runware generation provider (PixVerse video + Gemini image)
pub struct RunwareProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    video_model: String,
}

impl std::fmt::Debug for RunwareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunwareProvider")
            .field("base_url", &self.base_url)
            .field("video_model", &self.video_model)
            .finish_non_exhaustive()
    }
}

impl RunwareProvider {
    /// Create a new Runware provider with default configuration
    pub fn new(api_key: impl Into<String>) -> CoreResult<Self> {
        Self::from_config(&ProviderConfig::with_api_key(api_key))
    }

    /// Create a provider from a configuration: API key, base URL override,
    /// HTTP timeout, and the video model ID
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
            video_model: config
                .model_id
                .clone()
                .unwrap_or_else(|| VIDEO_MODEL.to_string()),
        })
    }

    /// Set custom base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// 720p-tier video dimensions for an aspect ratio
    fn video_dimensions(aspect_ratio: Option<&str>) -> (u32, u32) {
        match aspect_ratio.unwrap_or("16:9") {
            "9:16" | "3:4" => (720, 1280),
            "1:1" => (720, 720),
            _ => (1280, 720),
        }
    }

    /// Image dimensions, constrained to 64-pixel multiples
    fn image_dimensions(aspect_ratio: Option<&str>) -> (u32, u32) {
        match aspect_ratio.unwrap_or("1:1") {
            "16:9" | "21:9" => (1344, 768),
            "9:16" => (768, 1344),
            "4:3" => (1152, 896),
            "3:4" => (896, 1152),
            _ => (1024, 1024),
        }
    }

    /// Provider-local validation: effect prerequisites and reference limits
    fn validate_request(&self, request: &GenerationRequest) -> CoreResult<()> {
        match request.kind {
            MediaKind::Video => {
                let effect_id: Option<String> = request.get_setting(SETTING_EFFECT);
                if let Some(id) = &effect_id {
                    let effect = effect_by_id(id).ok_or_else(|| {
                        CoreError::InvalidRequest(format!("Unknown video effect: {}", id))
                    })?;

                    let refs = request.reference_media.len();
                    if effect.requires_reference && refs == 0 {
                        return Err(CoreError::InvalidRequest(format!(
                            "Effect '{}' requires a reference image",
                            effect.id
                        )));
                    }
                    if refs > effect.max_references {
                        return Err(CoreError::InvalidRequest(format!(
                            "Effect '{}' accepts at most {} reference image(s), got {}",
                            effect.id, effect.max_references, refs
                        )));
                    }
                } else if request.reference_media.len() > 1 {
                    return Err(CoreError::InvalidRequest(format!(
                        "Runware video accepts at most 1 reference image, got {}",
                        request.reference_media.len()
                    )));
                }
            }
            MediaKind::Image => {
                if !request.reference_media.is_empty() {
                    return Err(CoreError::InvalidRequest(
                        "Runware image generation does not accept reference media".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Build the PixVerse settings block from the request
    fn pixverse_settings(request: &GenerationRequest) -> CoreResult<Option<ProviderSettings>> {
        let mut settings = PixverseSettings::default();

        settings.effect = request.get_setting(SETTING_EFFECT);
        // Camera movement only applies when no effect is selected
        if settings.effect.is_none() {
            settings.camera_movement = request.get_setting(SETTING_CAMERA_MOVEMENT);
        }

        if let Some(style) = &request.style {
            let preset: StylePreset = style.parse().map_err(CoreError::InvalidRequest)?;
            settings.style = preset.wire_id().map(str::to_string);
        }

        settings.motionmode = request.get_setting(SETTING_MOTION_MODE);
        settings.sound_effect_switch = request.get_setting(SETTING_SOUND_EFFECT_SWITCH);
        settings.sound_effect_content = request.get_setting(SETTING_SOUND_EFFECT_CONTENT);

        if settings.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ProviderSettings { pixverse: settings }))
        }
    }

    /// Build the submission task for a request
    fn build_task(&self, request: &GenerationRequest, task_uuid: &str) -> CoreResult<InferenceTask> {
        let task = match request.kind {
            MediaKind::Video => {
                if let Some(requested) = request.duration_sec {
                    if requested != VIDEO_DURATION_SEC as f64 {
                        warn!(
                            "Runware video duration is fixed at {}s; overriding requested {}s",
                            VIDEO_DURATION_SEC, requested
                        );
                    }
                }
                let (width, height) = Self::video_dimensions(request.aspect_ratio.as_deref());
                InferenceTask {
                    task_type: "videoInference".to_string(),
                    task_uuid: task_uuid.to_string(),
                    model: self.video_model.clone(),
                    positive_prompt: request.prompt.clone(),
                    width,
                    height,
                    duration: Some(VIDEO_DURATION_SEC),
                    output_format: "MP4".to_string(),
                    delivery_method: "async".to_string(),
                    output_type: "URL".to_string(),
                    include_cost: true,
                    frame_images: request.reference_media.clone(),
                    provider_settings: Self::pixverse_settings(request)?,
                }
            }
            MediaKind::Image => {
                let (width, height) = Self::image_dimensions(request.aspect_ratio.as_deref());
                InferenceTask {
                    task_type: "imageInference".to_string(),
                    task_uuid: task_uuid.to_string(),
                    model: IMAGE_MODEL.to_string(),
                    positive_prompt: request.prompt.clone(),
                    width,
                    height,
                    duration: None,
                    output_format: "PNG".to_string(),
                    delivery_method: "async".to_string(),
                    output_type: "URL".to_string(),
                    include_cost: true,
                    frame_images: Vec::new(),
                    provider_settings: None,
                }
            }
        };
        Ok(task)
    }

    /// Classify one `getResponse` entry matching our task UUID
    fn classify_entry(kind: MediaKind, entry: &Value) -> PollOutcome {
        let status = entry
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        match status {
            "success" => {
                let rendered = entry.to_string();
                match MediaUrlExtractor::new(kind).extract(&rendered) {
                    Some(media_url) => PollOutcome::Completed { media_url },
                    // Success without a usable URL yet: keep polling
                    None => PollOutcome::Pending {
                        progress: None,
                        message: Some("success status without media URL".to_string()),
                    },
                }
            }
            "error" => PollOutcome::Failed {
                message: entry
                    .get("message")
                    .or_else(|| entry.get("error"))
                    .and_then(Value::as_str)
                    .unwrap_or("Runware task failed")
                    .to_string(),
            },
            _ => PollOutcome::Pending {
                progress: entry.get("progress").and_then(Value::as_f64),
                message: entry
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
        }
    }

    /// Entries from a task response body: either `{data: [...]}` or a bare array
    fn response_entries(body: &Value) -> Vec<&Value> {
        match body.get("data").and_then(Value::as_array) {
            Some(entries) => entries.iter().collect(),
            None => body.as_array().map(|a| a.iter().collect()).unwrap_or_default(),
        }
    }

    async fn post_tasks<T: Serialize>(&self, tasks: &[T]) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(tasks)
            .send()
            .await
    }
}

#[async_trait]
impl GenerationProvider for RunwareProvider {
    fn id(&self) -> &str {
        "runware"
    }

    fn kinds(&self) -> &[MediaKind] {
        &[MediaKind::Video, MediaKind::Image]
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn poll_config(&self, kind: MediaKind) -> PollConfig {
        match kind {
            // PixVerse video jobs take minutes; ~12 min budget
            MediaKind::Video => PollConfig {
                max_attempts: 240,
                base_interval_ms: 3000,
                max_interval_ms: 5000,
                backoff_factor: 1.1,
            },
            // Image tasks complete in seconds to a few minutes
            MediaKind::Image => PollConfig {
                max_attempts: 60,
                base_interval_ms: 2000,
                max_interval_ms: 5000,
                backoff_factor: 1.1,
            },
        }
    }

    async fn submit(&self, request: &GenerationRequest) -> CoreResult<JobHandle> {
        self.validate_request(request)?;

        let task_uuid = uuid::Uuid::new_v4().to_string();
        let task = self.build_task(request, &task_uuid)?;

        debug!(
            "Runware submit: kind={} model={} task_uuid={}",
            request.kind, task.model, task_uuid
        );

        let response = self
            .post_tasks(&[task])
            .await
            .map_err(|e| CoreError::Internal(format!("Runware submission network error: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to read Runware response: {}", e)))?;

        if !status.is_success() {
            return Err(CoreError::Submission {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        // A 2xx ack can still carry per-task errors in the envelope
        if let Ok(envelope) = serde_json::from_str::<TaskEnvelope>(&body) {
            if let Some(error) = envelope.errors.first() {
                return Err(CoreError::Submission {
                    status: status.as_u16(),
                    body: error.message(),
                });
            }
        }

        info!(
            "Runware {} generation submitted: task_uuid={}",
            request.kind, task_uuid
        );

        // The job ID is the client-generated task UUID: a 2xx ack is enough
        Ok(JobHandle {
            provider: self.id().to_string(),
            job_id: task_uuid,
            kind: request.kind,
            status_url: None,
            submitted_at: chrono::Utc::now().timestamp(),
        })
    }

    async fn check_status(&self, handle: &JobHandle) -> CoreResult<PollOutcome> {
        let status_task = StatusTask {
            task_type: "getResponse".to_string(),
            task_uuid: handle.job_id.clone(),
        };

        let response = self
            .post_tasks(&[status_task])
            .await
            .map_err(|e| CoreError::TransientPoll(format!("Runware poll network error: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::TransientPoll(format!("Failed to read poll response: {}", e)))?;

        if !status.is_success() {
            return Err(CoreError::TransientPoll(format!(
                "Runware poll returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: Value = serde_json::from_str(&body)
            .map_err(|e| CoreError::TransientPoll(format!("Unparseable poll response: {}", e)))?;

        let outcome = Self::response_entries(&parsed)
            .into_iter()
            .find(|entry| {
                entry.get("taskUUID").and_then(Value::as_str) == Some(handle.job_id.as_str())
            })
            .map(|entry| Self::classify_entry(handle.kind, entry))
            // No matching entry yet: the async task has not materialized
            .unwrap_or(PollOutcome::Pending {
                progress: None,
                message: None,
            });

        debug!(
            "Runware poll for task {}: terminal={}",
            handle.job_id,
            outcome.is_terminal()
        );

        Ok(outcome)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> RunwareProvider {
        RunwareProvider::new("test-key").unwrap()
    }

    #[test]
    fn test_provider_id_and_kinds() {
        let provider = provider();
        assert_eq!(provider.id(), "runware");
        assert!(provider.supports(MediaKind::Video));
        assert!(provider.supports(MediaKind::Image));
    }

    #[test]
    fn test_provider_availability() {
        assert!(provider().is_available());
        assert!(!RunwareProvider::new("").unwrap().is_available());
    }

    #[test]
    fn test_from_config_overrides() {
        let config = ProviderConfig::with_api_key("k")
            .with_base_url("https://proxy.example.com/v1")
            .with_model("pixverse:1@6");
        let provider = RunwareProvider::from_config(&config).unwrap();

        assert_eq!(provider.base_url, "https://proxy.example.com/v1");

        // The configured model flows into video submissions
        let request = GenerationRequest::new("A glacier");
        let task = provider.build_task(&request, "uuid-0").unwrap();
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"model\":\"pixverse:1@6\""));
    }

    #[test]
    fn test_from_config_defaults() {
        let provider = RunwareProvider::from_config(&ProviderConfig::default()).unwrap();
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(provider.video_model, VIDEO_MODEL);
        assert!(!provider.is_available());
    }

    #[test]
    fn test_poll_config_per_kind() {
        let provider = provider();

        let video = provider.poll_config(MediaKind::Video);
        assert_eq!(video.max_attempts, 240);
        assert_eq!(video.base_interval_ms, 3000);
        assert_eq!(video.max_interval_ms, 5000);

        let image = provider.poll_config(MediaKind::Image);
        assert_eq!(image.max_attempts, 60);
        assert_eq!(image.base_interval_ms, 2000);
    }

    #[test]
    fn test_video_dimensions() {
        assert_eq!(RunwareProvider::video_dimensions(Some("16:9")), (1280, 720));
        assert_eq!(RunwareProvider::video_dimensions(Some("9:16")), (720, 1280));
        assert_eq!(RunwareProvider::video_dimensions(Some("1:1")), (720, 720));
        assert_eq!(RunwareProvider::video_dimensions(None), (1280, 720));
    }

    #[test]
    fn test_image_dimensions_are_64_multiples() {
        for aspect in [None, Some("16:9"), Some("9:16"), Some("1:1"), Some("4:3")] {
            let (w, h) = RunwareProvider::image_dimensions(aspect);
            assert_eq!(w % 64, 0, "width {} for {:?}", w, aspect);
            assert_eq!(h % 64, 0, "height {} for {:?}", h, aspect);
        }
    }

    // =========================================================================
    // Validation Tests
    // =========================================================================

    #[test]
    fn test_validate_effect_requires_reference() {
        let request = GenerationRequest::new("flex").with_setting("effect", "muscle_surge");
        let error = provider().validate_request(&request).unwrap_err();
        assert!(matches!(error, CoreError::InvalidRequest(_)));
        assert!(error.to_string().contains("requires a reference"));
    }

    #[test]
    fn test_validate_effect_reference_cap() {
        let request = GenerationRequest::new("kiss")
            .with_setting("effect", "kiss_me_ai")
            .with_reference_media("https://cdn.example.com/a.jpg")
            .with_reference_media("https://cdn.example.com/b.jpg")
            .with_reference_media("https://cdn.example.com/c.jpg");
        let error = provider().validate_request(&request).unwrap_err();
        assert!(error.to_string().contains("at most 2"));
    }

    #[test]
    fn test_validate_unknown_effect() {
        let request = GenerationRequest::new("x").with_setting("effect", "not_an_effect");
        let error = provider().validate_request(&request).unwrap_err();
        assert!(error.to_string().contains("Unknown video effect"));
    }

    #[test]
    fn test_validate_promptless_effect_without_reference() {
        let request = GenerationRequest::new("zoom out").with_setting("effect", "earth_zoom_challenge");
        assert!(provider().validate_request(&request).is_ok());
    }

    #[test]
    fn test_validate_image_rejects_references() {
        let request = GenerationRequest::new("a cat")
            .with_kind(MediaKind::Image)
            .with_reference_media("https://cdn.example.com/ref.jpg");
        assert!(provider().validate_request(&request).is_err());
    }

    // =========================================================================
    // Task Building Tests
    // =========================================================================

    #[test]
    fn test_video_task_serialization() {
        let request = GenerationRequest::new("A neon city")
            .with_aspect_ratio("9:16")
            .with_style("cyberpunk")
            .with_setting("effect", "earth_zoom_challenge")
            .with_setting("motion_mode", "fast");

        let task = provider().build_task(&request, "uuid-1").unwrap();
        let json = serde_json::to_string(&task).unwrap();

        assert!(json.contains("\"taskType\":\"videoInference\""));
        assert!(json.contains("\"taskUUID\":\"uuid-1\""));
        assert!(json.contains("\"model\":\"pixverse:1@5\""));
        assert!(json.contains("\"positivePrompt\":\"A neon city\""));
        assert!(json.contains("\"width\":720"));
        assert!(json.contains("\"height\":1280"));
        assert!(json.contains("\"duration\":5"));
        assert!(json.contains("\"deliveryMethod\":\"async\""));
        assert!(json.contains("\"outputType\":\"URL\""));
        assert!(json.contains("\"effect\":\"earth_zoom_challenge\""));
        assert!(json.contains("\"style\":\"cyberpunk\""));
        assert!(json.contains("\"motionmode\":\"fast\""));
        // No reference media: frameImages omitted entirely
        assert!(!json.contains("frameImages"));
    }

    #[test]
    fn test_video_task_camera_movement_only_without_effect() {
        let request = GenerationRequest::new("pan over hills")
            .with_setting("camera_movement", "zoom_in");
        let task = provider().build_task(&request, "uuid-2").unwrap();
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"cameraMovement\":\"zoom_in\""));

        let request = GenerationRequest::new("pan")
            .with_setting("effect", "earth_zoom_challenge")
            .with_setting("camera_movement", "zoom_in");
        let task = provider().build_task(&request, "uuid-3").unwrap();
        let json = serde_json::to_string(&task).unwrap();
        assert!(!json.contains("cameraMovement"));
    }

    #[test]
    fn test_video_task_none_style_omitted() {
        let request = GenerationRequest::new("plain").with_style("none");
        let task = provider().build_task(&request, "uuid-4").unwrap();
        let json = serde_json::to_string(&task).unwrap();
        assert!(!json.contains("providerSettings"));
    }

    #[test]
    fn test_image_task_serialization() {
        let request = GenerationRequest::new("A watercolor fox").with_kind(MediaKind::Image);
        let task = provider().build_task(&request, "uuid-5").unwrap();
        let json = serde_json::to_string(&task).unwrap();

        assert!(json.contains("\"taskType\":\"imageInference\""));
        assert!(json.contains("\"model\":\"gemini-2.5-flash-image\""));
        assert!(json.contains("\"outputFormat\":\"PNG\""));
        assert!(!json.contains("duration"));
        assert!(!json.contains("providerSettings"));
    }

    // =========================================================================
    // Status Classification Tests
    // =========================================================================

    #[test]
    fn test_classify_success_entry() {
        let entry: Value = serde_json::from_str(
            r#"{"taskUUID":"t1","status":"success","videoURL":"https://im.runware.ai/v/x.mp4","cost":0.4}"#,
        )
        .unwrap();
        match RunwareProvider::classify_entry(MediaKind::Video, &entry) {
            PollOutcome::Completed { media_url } => {
                assert_eq!(media_url, "https://im.runware.ai/v/x.mp4");
            }
            other => panic!("Expected completed, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_success_with_video_path_field() {
        let entry: Value = serde_json::from_str(
            r#"{"taskUUID":"t1","status":"success","videoPath":"https://im.runware.ai/v/y.mp4"}"#,
        )
        .unwrap();
        assert!(matches!(
            RunwareProvider::classify_entry(MediaKind::Video, &entry),
            PollOutcome::Completed { .. }
        ));
    }

    #[test]
    fn test_classify_success_without_url_stays_pending() {
        let entry: Value =
            serde_json::from_str(r#"{"taskUUID":"t1","status":"success"}"#).unwrap();
        assert!(matches!(
            RunwareProvider::classify_entry(MediaKind::Video, &entry),
            PollOutcome::Pending { .. }
        ));
    }

    #[test]
    fn test_classify_error_entry() {
        let entry: Value = serde_json::from_str(
            r#"{"taskUUID":"t1","status":"error","message":"content moderation"}"#,
        )
        .unwrap();
        match RunwareProvider::classify_entry(MediaKind::Video, &entry) {
            PollOutcome::Failed { message } => assert!(message.contains("content moderation")),
            other => panic!("Expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_processing_entry() {
        let entry: Value = serde_json::from_str(
            r#"{"taskUUID":"t1","status":"processing","progress":42.0}"#,
        )
        .unwrap();
        match RunwareProvider::classify_entry(MediaKind::Video, &entry) {
            PollOutcome::Pending { progress, .. } => assert_eq!(progress, Some(42.0)),
            other => panic!("Expected pending, got {:?}", other),
        }
    }

    #[test]
    fn test_response_entries_enveloped_and_bare() {
        let enveloped: Value =
            serde_json::from_str(r#"{"data":[{"taskUUID":"a"},{"taskUUID":"b"}]}"#).unwrap();
        assert_eq!(RunwareProvider::response_entries(&enveloped).len(), 2);

        let bare: Value = serde_json::from_str(r#"[{"taskUUID":"a"}]"#).unwrap();
        assert_eq!(RunwareProvider::response_entries(&bare).len(), 1);

        let neither: Value = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert!(RunwareProvider::response_entries(&neither).is_empty());
    }
}
