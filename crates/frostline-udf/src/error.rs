//! Error types for function deployment.

use frostline_commons::RemoteOperationError;
use frostline_staging::{StagingError, UploadError};
use thiserror::Error;

/// Errors raised while deploying a function.
///
/// Any step failure aborts the whole deployment; the engine registers no
/// partial function. Artifacts staged before the failure are left in place
/// so a retry can reuse them.
#[derive(Debug, Error)]
pub enum UdfError {
    #[error("no artifact found for dependency '{0}'")]
    DependencyResolution(String),

    #[error("invalid function specification: {0}")]
    InvalidSpec(String),

    #[error("failed to read function template '{path}'")]
    Template {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error("failed to stage function artifacts")]
    Upload(#[source] UploadError),

    #[error("failed to create function '{name}'")]
    CreateFunction {
        name: String,
        #[source]
        source: RemoteOperationError,
    },

    #[error("function deployment cancelled")]
    Cancelled,
}

/// Result type for deployment operations.
pub type Result<T> = std::result::Result<T, UdfError>;
