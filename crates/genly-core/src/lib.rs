//! Genly Core Library
//!
//! Asynchronous task-orchestration core for generative-media providers:
//! submit a generation job, poll heterogeneous status protocols to
//! completion, and normalize the result into a single stable contract.
//! UI, media upload, and persistence live outside this crate.

pub mod error;
pub mod generative;

pub use error::{CoreError, CoreResult};
