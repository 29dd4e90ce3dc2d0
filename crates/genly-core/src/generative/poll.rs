//! Poll Loop Engine
//!
//! Generic scheduler that drives a submitted job to completion by repeated
//! status checks with bounded backoff, an attempt-count timeout, and
//! cooperative cancellation. Provider- and request-agnostic: all protocol
//! knowledge stays in the adapter behind `check_status`.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::job::{JobHandle, PollOutcome};
use super::providers::GenerationProvider;
use crate::error::{CoreError, CoreResult};

// =============================================================================
// Poll Configuration
// =============================================================================

/// Configuration for the poll loop
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PollConfig {
    /// Maximum number of status checks before timing out
    pub max_attempts: u32,
    /// Initial delay between checks in milliseconds
    pub base_interval_ms: u64,
    /// Upper bound for the delay in milliseconds
    pub max_interval_ms: u64,
    /// Multiplier applied to the delay after each check (>= 1.0)
    pub backoff_factor: f64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 120,
            base_interval_ms: 2000,
            max_interval_ms: 10_000,
            backoff_factor: 1.5,
        }
    }
}

impl PollConfig {
    /// Config with a fixed interval (no backoff)
    pub fn fixed(max_attempts: u32, interval_ms: u64) -> Self {
        Self {
            max_attempts,
            base_interval_ms: interval_ms,
            max_interval_ms: interval_ms,
            backoff_factor: 1.0,
        }
    }

    /// Sets the maximum attempt count
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the initial interval
    pub fn with_base_interval_ms(mut self, interval_ms: u64) -> Self {
        self.base_interval_ms = interval_ms;
        self
    }

    /// Sets the interval cap
    pub fn with_max_interval_ms(mut self, interval_ms: u64) -> Self {
        self.max_interval_ms = interval_ms;
        self
    }

    /// Sets the backoff multiplier (values below 1.0 are clamped up)
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor.max(1.0);
        self
    }
}

// =============================================================================
// Observability
// =============================================================================

/// Outcome classification reported to the poll event sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollOutcomeKind {
    /// Status check returned a pending state
    Pending,
    /// Status check returned the completed media URL
    Completed,
    /// Upstream explicitly reported failure
    Failed,
    /// Network or upstream availability error, retried
    TransientError,
}

impl std::fmt::Display for PollOutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollOutcomeKind::Pending => write!(f, "pending"),
            PollOutcomeKind::Completed => write!(f, "completed"),
            PollOutcomeKind::Failed => write!(f, "failed"),
            PollOutcomeKind::TransientError => write!(f, "transient_error"),
        }
    }
}

/// Diagnostic event emitted once per poll iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollEvent {
    /// 1-based attempt number
    pub attempt: u32,
    /// Wall-clock time since polling started
    pub elapsed_ms: u64,
    /// What the iteration observed
    pub outcome: PollOutcomeKind,
}

/// Callback invoked with a 0-100 progress estimate
pub type ProgressCallback = Box<dyn Fn(f64) + Send + Sync + 'static>;

/// Sink receiving one `PollEvent` per iteration
pub type PollEventSink = Box<dyn Fn(&PollEvent) + Send + Sync + 'static>;

// =============================================================================
// Cancellation
// =============================================================================

/// Cooperative cancellation flag shared between a caller and a poll loop.
///
/// Cancellation is checked at the top of each iteration; once set, no
/// further network calls are issued. In-flight upstream jobs are not
/// retracted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a new, un-cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Poll Loop
// =============================================================================

/// Completion data produced by a successful poll loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollCompletion {
    /// Validated absolute media URL
    pub media_url: String,
    /// Number of status checks issued
    pub attempts: u32,
    /// Wall-clock polling time in milliseconds
    pub elapsed_ms: u64,
}

/// Drives a submitted job to a terminal state
pub struct PollLoop {
    config: PollConfig,
    progress: Option<ProgressCallback>,
    events: Option<PollEventSink>,
    cancel: Option<CancelToken>,
}

impl PollLoop {
    /// Creates a poll loop with the given configuration
    pub fn new(config: PollConfig) -> Self {
        Self {
            config,
            progress: None,
            events: None,
            cancel: None,
        }
    }

    /// Attaches a progress callback
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Attaches a per-iteration event sink
    pub fn with_event_sink(mut self, sink: PollEventSink) -> Self {
        self.events = Some(sink);
        self
    }

    /// Attaches an external cancellation token
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Polls until a terminal outcome, the attempt budget runs out, or
    /// cancellation is requested.
    pub async fn run(
        &self,
        provider: &dyn GenerationProvider,
        handle: &JobHandle,
    ) -> CoreResult<PollCompletion> {
        let started = Instant::now();
        let factor = self.config.backoff_factor.max(1.0);
        let mut interval_ms = self.config.base_interval_ms.min(self.config.max_interval_ms);

        debug!(
            "Polling started: provider={} job_id={} max_attempts={}",
            handle.provider, handle.job_id, self.config.max_attempts
        );

        for attempt in 1..=self.config.max_attempts {
            if let Some(token) = &self.cancel {
                if token.is_cancelled() {
                    info!(
                        "Polling cancelled: job_id={} before attempt {}",
                        handle.job_id, attempt
                    );
                    return Err(CoreError::Cancelled);
                }
            }

            let result = provider.check_status(handle).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match result {
                Ok(PollOutcome::Completed { media_url }) => {
                    self.emit(attempt, elapsed_ms, PollOutcomeKind::Completed);
                    self.report_progress(100.0);
                    info!(
                        "Generation completed: job_id={} attempts={} elapsed_ms={}",
                        handle.job_id, attempt, elapsed_ms
                    );
                    return Ok(PollCompletion {
                        media_url,
                        attempts: attempt,
                        elapsed_ms,
                    });
                }
                Ok(PollOutcome::Failed { message }) => {
                    self.emit(attempt, elapsed_ms, PollOutcomeKind::Failed);
                    warn!(
                        "Generation failed: job_id={} attempt={}: {}",
                        handle.job_id, attempt, message
                    );
                    return Err(CoreError::GenerationFailed(message));
                }
                Ok(PollOutcome::Pending { progress, message }) => {
                    self.emit(attempt, elapsed_ms, PollOutcomeKind::Pending);
                    debug!(
                        "Job pending: job_id={} attempt={}/{} provider_progress={:?} message={:?}",
                        handle.job_id, attempt, self.config.max_attempts, progress, message
                    );
                }
                // Control-flow-equivalent to Pending, but observable.
                Err(error) if error.is_transient() => {
                    self.emit(attempt, elapsed_ms, PollOutcomeKind::TransientError);
                    warn!(
                        "Transient poll error: job_id={} attempt={}/{}: {}",
                        handle.job_id, attempt, self.config.max_attempts, error
                    );
                }
                Err(error) => return Err(error),
            }

            self.report_progress(self.estimate_progress(attempt));

            if attempt < self.config.max_attempts {
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                interval_ms = next_interval(interval_ms, factor, self.config.max_interval_ms);
            }
        }

        warn!(
            "Polling timed out: job_id={} after {} attempts",
            handle.job_id, self.config.max_attempts
        );
        Err(CoreError::Timeout {
            attempts: self.config.max_attempts,
        })
    }

    /// Attempt-derived progress estimate, capped below 100 until completion
    fn estimate_progress(&self, attempt: u32) -> f64 {
        let max = self.config.max_attempts.max(1) as f64;
        ((attempt as f64 / max) * 100.0).min(99.0)
    }

    fn emit(&self, attempt: u32, elapsed_ms: u64, outcome: PollOutcomeKind) {
        if let Some(sink) = &self.events {
            sink(&PollEvent {
                attempt,
                elapsed_ms,
                outcome,
            });
        }
    }

    fn report_progress(&self, pct: f64) {
        if let Some(callback) = &self.progress {
            callback(pct);
        }
    }
}

/// Next inter-attempt delay: scaled by the factor, never shrinking, capped.
fn next_interval(current_ms: u64, factor: f64, max_ms: u64) -> u64 {
    let scaled = (current_ms as f64 * factor).round() as u64;
    scaled.max(current_ms).min(max_ms)
}

// =============================================================================
// Tests
// =============================================================================
