//! Genly Error Definitions
//!
//! Defines error types used throughout the generation core.

use thiserror::Error;

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Request Errors
    // =========================================================================
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    // =========================================================================
    // Submission Errors
    // =========================================================================
    #[error("Submission rejected ({status}): {body}")]
    Submission { status: u16, body: String },

    // =========================================================================
    // Polling Errors
    // =========================================================================
    #[error("Transient poll failure: {0}")]
    TransientPoll(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Timed out after {attempts} poll attempts")]
    Timeout { attempts: u32 },

    #[error("Generation cancelled")]
    Cancelled,

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Whether the error is retryable within a poll loop
    pub fn is_transient(&self) -> bool {
        matches!(self, CoreError::TransientPoll(_))
    }

    /// Whether the error represents a terminal generation outcome
    /// (as opposed to a configuration or input problem).
    pub fn is_terminal_outcome(&self) -> bool {
        matches!(
            self,
            CoreError::GenerationFailed(_) | CoreError::Timeout { .. } | CoreError::Cancelled
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
