//! Asynchronous Media Generation
//!
//! Submit-and-poll orchestration over heterogeneous generative-media
//! providers: job types, media URL extraction, the poll loop engine, the
//! provider abstraction with concrete adapters, and the engine façade.

pub mod effects;
pub mod engine;
pub mod extract;
pub mod job;
pub mod poll;
pub mod provider_impls;
pub mod providers;

// Re-export main types
pub use effects::{effect_by_id, effects_by_category, EffectCategory, StylePreset, VideoEffect, VIDEO_EFFECTS};
pub use engine::{GenerateOptions, GenerationEngine, ProviderInfo};
pub use extract::MediaUrlExtractor;
pub use job::{GenerationRequest, JobHandle, MediaKind, NormalizedResult, PollOutcome};
pub use poll::{
    CancelToken, PollCompletion, PollConfig, PollEvent, PollEventSink, PollLoop, PollOutcomeKind,
    ProgressCallback,
};
pub use provider_impls::{RunwareProvider, Sora2Provider, Veo3Provider};
pub use providers::{GenerationProvider, MockProvider, ProviderConfig};
