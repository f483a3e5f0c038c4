//! # frostline-staging
//!
//! Staging area handling for the Frostline loader and UDF builder:
//! - **Stage manager**: idempotent create-if-absent stage provisioning
//! - **Uploader**: name-addressed, skip-if-present file upload with
//!   fractional progress and per-file cancellation
//!
//! Staged file names are compared case-insensitively throughout because the
//! remote engine case-folds them. Correctness under concurrent jobs rests on
//! these idempotent, name-addressed operations rather than locking.

pub mod error;
pub mod manager;
pub mod stage;
pub mod uploader;

// Re-export commonly used types
pub use error::{StagingError, UploadError, UploadErrorKind};
pub use manager::StageManager;
pub use stage::{Stage, StageKind, StagedFile};
pub use uploader::{StageUploader, UploadOutcome};
