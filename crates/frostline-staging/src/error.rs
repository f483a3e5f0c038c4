//! Error types for stage provisioning and upload.

use std::path::PathBuf;

use frostline_commons::RemoteOperationError;
use thiserror::Error;

use crate::stage::StagedFile;

/// Errors raised while creating or listing staging areas.
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("failed to create stage '{stage}'")]
    Create {
        stage: String,
        #[source]
        source: RemoteOperationError,
    },

    #[error("failed to list files in stage '@{stage}'")]
    List {
        stage: String,
        #[source]
        source: RemoteOperationError,
    },
}

/// Result type for staging operations.
pub type Result<T> = std::result::Result<T, StagingError>;

/// Why an upload stopped.
#[derive(Debug, Error)]
pub enum UploadErrorKind {
    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error("failed to transfer '{file}' to stage '@{stage}'")]
    Transfer {
        file: String,
        stage: String,
        #[source]
        source: RemoteOperationError,
    },

    #[error("upload cancelled")]
    Cancelled,

    #[error("path has no file name: {}", .0.display())]
    InvalidPath(PathBuf),
}

/// Upload failure carrying the files already transferred in this call.
///
/// The transferred subset stays staged on failure; compensating cleanup is
/// the caller's decision, so the partial set must survive the error.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct UploadError {
    #[source]
    kind: UploadErrorKind,
    transferred: Vec<StagedFile>,
}

impl UploadError {
    pub fn new(kind: UploadErrorKind, transferred: Vec<StagedFile>) -> Self {
        Self { kind, transferred }
    }

    pub fn kind(&self) -> &UploadErrorKind {
        &self.kind
    }

    /// Files transferred by the failing call, in upload order.
    pub fn transferred(&self) -> &[StagedFile] {
        &self.transferred
    }
}
