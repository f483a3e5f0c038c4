//! Error types for bulk load jobs.

use frostline_commons::RemoteOperationError;
use frostline_staging::{StagingError, UploadError};
use thiserror::Error;

/// Errors raised by [`crate::executor::BulkLoader::load_and_cleanup`].
///
/// The original failure is always the error's source; secondary failures
/// during compensating cleanup are logged at debug level and never surface
/// here.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid loader settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error("failed to stage data files for table {table}")]
    Upload {
        table: String,
        #[source]
        source: UploadError,
    },

    #[error("bulk load into table {table} failed")]
    CopyIn {
        table: String,
        #[source]
        source: RemoteOperationError,
    },

    #[error("bulk load cancelled")]
    Cancelled,
}

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;
