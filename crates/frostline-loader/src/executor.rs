//! Bulk copy-in execution with compensating cleanup.

use std::path::PathBuf;
use std::sync::Arc;

use frostline_commons::{
    CancelToken, Dialect, FileTransport, ProgressSink, RemoteFileLister, StatementExecutor, TableRef,
};
use frostline_staging::{StagedFile, StageKind, StageManager, StageUploader};

use crate::error::{LoadError, Result};
use crate::settings::{stage_reference, LoaderSettings, StageSelection};

/// One bulk load invocation: target table, ordered source files and the
/// host-supplied settings. Consumed once; re-invoking after a failure is the
/// caller's decision.
#[derive(Debug)]
pub struct LoadJob {
    pub table: TableRef,
    pub files: Vec<PathBuf>,
    pub settings: LoaderSettings,
}

/// Stages a job's files and copies them into the target table.
pub struct BulkLoader {
    executor: Arc<dyn StatementExecutor>,
    dialect: Arc<dyn Dialect>,
    stages: StageManager,
    uploader: StageUploader,
}

impl BulkLoader {
    pub fn new(
        executor: Arc<dyn StatementExecutor>,
        dialect: Arc<dyn Dialect>,
        lister: Arc<dyn RemoteFileLister>,
        transport: Arc<dyn FileTransport>,
    ) -> Self {
        let stages = StageManager::new(Arc::clone(&executor), Arc::clone(&dialect));
        let uploader = StageUploader::new(lister, transport);
        Self {
            executor,
            dialect,
            stages,
            uploader,
        }
    }

    /// Loads the job's files into its target table.
    ///
    /// The copy-in names exactly the job's staged files and sets the purge
    /// flag, so the engine deletes consumed files on success and no explicit
    /// remove is issued. On failure, the files transferred by this call are
    /// removed best-effort; files that were already staged (possibly by a
    /// concurrent job sharing the stage) are left untouched, and the
    /// original failure is what the caller observes.
    pub async fn load_and_cleanup(
        &self,
        job: LoadJob,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<()> {
        job.settings.validate()?;
        let copy_options = job.settings.file_format.copy_options(&job.settings)?;
        let put_options = job.settings.file_format.put_options(&job.settings);

        let stage = self.resolve_stage(&job).await?;
        let file_names = remote_file_names(&job.files)?;

        progress.set_message("Loading data files into the remote engine...");
        let outcome = match self
            .uploader
            .upload(&stage, &job.files, &put_options, progress, cancel)
            .await
        {
            Ok(outcome) => outcome,
            Err(source) => {
                self.remove_staged(&stage, source.transferred()).await;
                return Err(LoadError::Upload {
                    table: job.table.to_string(),
                    source,
                });
            }
        };

        if cancel.check().is_err() {
            self.remove_staged(&stage, &outcome.transferred).await;
            return Err(LoadError::Cancelled);
        }

        let copy_sql = format!(
            "COPY INTO {table} \nFROM '@{stage}' FILES=({files}) {copy_options}\n PURGE=TRUE",
            table = self.dialect.create_full_name(&job.table.parts()),
            files = quoted_list(&file_names),
        );
        progress.set_message(
            "Loading staged data into the target table (this might take some time without progress changes)",
        );
        if let Err(source) = self.executor.execute(&copy_sql).await {
            self.remove_staged(&stage, &outcome.transferred).await;
            return Err(LoadError::CopyIn {
                table: job.table.to_string(),
                source,
            });
        }
        progress.set_message(&format!("Data loaded into table {}", job.table));
        progress.set_fraction(1.0);
        Ok(())
    }

    async fn resolve_stage(&self, job: &LoadJob) -> Result<String> {
        if let StageSelection::Internal { name } = &job.settings.stage {
            let [catalog, schema, _] = job.table.parts();
            let scope: Vec<&str> = [catalog, schema]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect();
            let stage = self.stages.ensure_stage(name, StageKind::Named, &scope).await?;
            Ok(stage.reference().to_string())
        } else {
            Ok(stage_reference(&job.settings.stage, &job.table, self.dialect.as_ref()))
        }
    }

    /// Best-effort removal of the files staged by this call. Failures are
    /// logged and swallowed so they never mask the primary error.
    async fn remove_staged(&self, stage: &str, files: &[StagedFile]) {
        for file in files {
            let sql = format!("REMOVE '@{}/{}'", stage, file.remote_name);
            if let Err(err) = self.executor.execute(&sql).await {
                log::debug!("Failed to remove staged file '{}': {err}", file.remote_name);
            }
        }
    }
}

fn remote_file_names(files: &[PathBuf]) -> Result<Vec<String>> {
    files
        .iter()
        .map(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    LoadError::InvalidSettings(format!("path has no file name: {}", path.display()))
                })
        })
        .collect()
}

fn quoted_list(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|name| format!("'{name}'")).collect();
    quoted.join(",")
}
