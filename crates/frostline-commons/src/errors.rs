//! Shared error types for Frostline crates.

use thiserror::Error;

/// Failure reported by a remote session collaborator (statement execution,
/// stage listing, file transfer).
///
/// The session layer is out of scope here, so this type only carries the
/// message and optional cause needed to diagnose the failed operation.
/// Higher-level crates wrap it with stage/file/table context.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RemoteOperationError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RemoteOperationError {
    /// Creates an error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The failure message as reported by the session layer.
    pub fn message(&self) -> &str {
        &self.message
    }
}
