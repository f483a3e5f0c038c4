//! Collaborator traits for the remote session.
//!
//! The connection/session layer itself is out of scope; these traits are the
//! narrow surface the loader and the UDF builder require from it. All
//! operations run sequentially against one session, so implementations do
//! not need to be re-entrant per job.

use std::path::Path;

use async_trait::async_trait;

use crate::errors::RemoteOperationError;
use crate::models::Compression;

/// Executes a single SQL statement on the session.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    async fn execute(&self, sql: &str) -> Result<(), RemoteOperationError>;
}

/// Lists the file names currently present in a staging area.
///
/// Names are returned as reported by the engine; callers must compare them
/// case-insensitively because the engine case-folds staged names.
#[async_trait]
pub trait RemoteFileLister: Send + Sync {
    async fn list(&self, stage: &str) -> Result<Vec<String>, RemoteOperationError>;
}

/// Transfers one local file into a staging area.
///
/// The remote file name is derived from the local base name by the engine.
#[async_trait]
pub trait FileTransport: Send + Sync {
    async fn transfer(
        &self,
        local_path: &Path,
        stage: &str,
        options: &PutOptions,
    ) -> Result<(), RemoteOperationError>;
}

/// Options attached to a file transfer command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PutOptions {
    /// Whether the engine may compress the file during transfer.
    pub auto_compress: bool,
    /// Codec the local file is already compressed with, if any.
    pub source_compression: Option<Compression>,
    /// Whether an existing remote file of the same name is replaced.
    pub overwrite: bool,
}

impl Default for PutOptions {
    fn default() -> Self {
        Self {
            auto_compress: false,
            source_compression: None,
            overwrite: false,
        }
    }
}

impl PutOptions {
    /// Renders the options as the trailing clause of a transfer command.
    pub fn to_sql(&self) -> String {
        let mut clause = String::new();
        if let Some(codec) = self.source_compression {
            clause.push_str(" SOURCE_COMPRESSION=");
            clause.push_str(codec.as_sql());
        }
        clause.push_str(if self.auto_compress {
            " AUTO_COMPRESS=TRUE"
        } else {
            " AUTO_COMPRESS=FALSE"
        });
        if self.overwrite {
            clause.push_str(" OVERWRITE = TRUE");
        }
        clause
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_disable_compression() {
        assert_eq!(PutOptions::default().to_sql(), " AUTO_COMPRESS=FALSE");
    }

    #[test]
    fn gzip_source_and_overwrite_are_rendered() {
        let options = PutOptions {
            auto_compress: false,
            source_compression: Some(Compression::Gzip),
            overwrite: true,
        };
        assert_eq!(
            options.to_sql(),
            " SOURCE_COMPRESSION=GZIP AUTO_COMPRESS=FALSE OVERWRITE = TRUE"
        );
    }
}
