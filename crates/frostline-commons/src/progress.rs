//! Progress reporting and cooperative cancellation.
//!
//! Long-running jobs report fractional progress and poll for cancellation at
//! step boundaries only. An in-flight remote operation always completes
//! before cancellation is observed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// Raised when a job observes a cancellation request at a step boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Shared cancellation flag, polled between steps.
#[derive(Debug, Default, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. The job observes it at its next poll.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Fails with [`Cancelled`] if cancellation was requested.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Receiver for job progress updates.
///
/// Implementations must tolerate repeated fractions; the reported value is
/// monotonic per job but may be reported again unchanged.
pub trait ProgressSink: Send + Sync {
    /// Human-readable description of the current step.
    fn set_message(&self, message: &str);

    /// Fraction of completed work in `0.0..=1.0`.
    fn set_fraction(&self, fraction: f64);
}

/// Progress sink that discards all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn set_message(&self, _message: &str) {}

    fn set_fraction(&self, _fraction: f64) {}
}
