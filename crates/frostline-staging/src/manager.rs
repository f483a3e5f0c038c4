//! Idempotent staging area provisioning.

use std::sync::Arc;

use frostline_commons::{Dialect, StatementExecutor};

use crate::error::{Result, StagingError};
use crate::stage::{Stage, StageKind};

/// Ensures staging areas exist before files are transferred into them.
///
/// Creation is create-if-absent and carries no rollback semantics: a stage
/// is never part of a larger transaction, and ensuring the same stage twice
/// is a no-op the second time.
pub struct StageManager {
    executor: Arc<dyn StatementExecutor>,
    dialect: Arc<dyn Dialect>,
}

impl StageManager {
    pub fn new(executor: Arc<dyn StatementExecutor>, dialect: Arc<dyn Dialect>) -> Self {
        Self { executor, dialect }
    }

    /// Idempotently ensures the stage exists and returns a handle to it.
    ///
    /// `scope` names the namespace the stage lives in; pass `&[]` for stages
    /// addressed relative to the session's current namespace.
    pub async fn ensure_stage(&self, name: &str, kind: StageKind, scope: &[&str]) -> Result<Stage> {
        let mut parts: Vec<&str> = scope.to_vec();
        parts.push(name);
        let full_name = self.dialect.create_full_name(&parts);

        let sql = match kind {
            StageKind::Ephemeral => {
                format!("CREATE OR REPLACE TEMPORARY STAGE {full_name}")
            }
            StageKind::Named | StageKind::PerArtifact => {
                format!("CREATE STAGE IF NOT EXISTS {full_name}")
            }
        };
        log::debug!("Ensuring stage {full_name}: {sql}");
        self.executor
            .execute(&sql)
            .await
            .map_err(|source| StagingError::Create {
                stage: full_name.clone(),
                source,
            })?;
        Ok(Stage::new(name, kind, scope, full_name))
    }
}
