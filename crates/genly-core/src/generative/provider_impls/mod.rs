//! Provider Implementations
//!
//! Concrete adapters for the supported generation services.

pub mod runware;
pub mod sora;
pub mod veo;

pub use runware::RunwareProvider;
pub use sora::Sora2Provider;
pub use veo::Veo3Provider;
