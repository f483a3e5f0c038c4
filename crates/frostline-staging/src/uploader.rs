//! Idempotent, name-addressed file upload.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use frostline_commons::{
    format_byte_size, CancelToken, FileTransport, ProgressSink, PutOptions, RemoteFileLister,
};

use crate::error::{StagingError, UploadError, UploadErrorKind};
use crate::stage::StagedFile;

/// Result of one upload call.
#[derive(Debug, Default, Clone)]
pub struct UploadOutcome {
    /// Files actually transferred by this call, in upload order. Files that
    /// were already staged are not listed here.
    pub transferred: Vec<StagedFile>,
    /// Number of files skipped because they were already staged.
    pub skipped: usize,
}

/// Uploads files into a staging area, skipping files already present.
///
/// Remote existence is checked by name only; the engine case-folds staged
/// names, so the comparison is case-insensitive. Two local files whose names
/// differ only by case therefore collide remotely, and the second one is
/// treated as already staged.
pub struct StageUploader {
    lister: Arc<dyn RemoteFileLister>,
    transport: Arc<dyn FileTransport>,
}

impl StageUploader {
    pub fn new(lister: Arc<dyn RemoteFileLister>, transport: Arc<dyn FileTransport>) -> Self {
        Self { lister, transport }
    }

    /// Ensures every file in `files` is present in the stage.
    ///
    /// Progress is reported as `i / files.len()` after every file, skipped or
    /// transferred, so callers see deterministic progress even when most
    /// files are already staged. Cancellation is polled once per file and
    /// never interrupts an in-flight transfer.
    ///
    /// On failure the returned [`UploadError`] names the files transferred so
    /// far; they remain staged and compensating cleanup is the caller's
    /// decision.
    pub async fn upload(
        &self,
        stage: &str,
        files: &[PathBuf],
        options: &PutOptions,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<UploadOutcome, UploadError> {
        let mut staged_names = match self.list_lowercased(stage).await {
            Ok(names) => names,
            Err(err) => return Err(UploadError::new(err.into(), Vec::new())),
        };

        let total = files.len();
        let mut outcome = UploadOutcome::default();
        for (index, path) in files.iter().enumerate() {
            if cancel.check().is_err() {
                return Err(UploadError::new(UploadErrorKind::Cancelled, outcome.transferred));
            }
            let remote_name = match file_name_of(path) {
                Some(name) => name,
                None => {
                    return Err(UploadError::new(
                        UploadErrorKind::InvalidPath(path.clone()),
                        outcome.transferred,
                    ))
                }
            };
            let folded = remote_name.to_lowercase();
            if staged_names.contains(&folded) {
                log::debug!("File '{remote_name}' already staged in '@{stage}', skipping transfer");
                outcome.skipped += 1;
            } else {
                progress.set_message(&format!(
                    "Uploading file {} of {} of size {} (this might take some time without progress changes)",
                    index + 1,
                    total,
                    file_size_of(path),
                ));
                if let Err(source) = self.transport.transfer(path, stage, options).await {
                    return Err(UploadError::new(
                        UploadErrorKind::Transfer {
                            file: remote_name,
                            stage: stage.to_string(),
                            source,
                        },
                        outcome.transferred,
                    ));
                }
                staged_names.insert(folded);
                outcome.transferred.push(StagedFile {
                    local_path: path.clone(),
                    stage: stage.to_string(),
                    remote_name,
                });
            }
            progress.set_fraction((index + 1) as f64 / total as f64);
        }
        Ok(outcome)
    }

    async fn list_lowercased(&self, stage: &str) -> Result<HashSet<String>, StagingError> {
        let names = self
            .lister
            .list(stage)
            .await
            .map_err(|source| StagingError::List {
                stage: stage.to_string(),
                source,
            })?;
        Ok(names.into_iter().map(|name| name.to_lowercase()).collect())
    }
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

fn file_size_of(path: &Path) -> String {
    match std::fs::metadata(path) {
        Ok(meta) => format_byte_size(meta.len()),
        Err(_) => "unknown size".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use frostline_commons::{NoopProgress, RemoteOperationError};

    use super::*;

    #[derive(Default)]
    struct FakeLister {
        names: Vec<String>,
    }

    #[async_trait]
    impl RemoteFileLister for FakeLister {
        async fn list(&self, _stage: &str) -> Result<Vec<String>, RemoteOperationError> {
            Ok(self.names.clone())
        }
    }

    #[derive(Default)]
    struct RecordingTransport {
        transferred: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    #[async_trait]
    impl FileTransport for RecordingTransport {
        async fn transfer(
            &self,
            local_path: &Path,
            _stage: &str,
            _options: &PutOptions,
        ) -> Result<(), RemoteOperationError> {
            let name = local_path.file_name().unwrap().to_string_lossy().into_owned();
            if self.fail_on.as_deref() == Some(name.as_str()) {
                return Err(RemoteOperationError::new("connection reset"));
            }
            self.transferred.lock().unwrap().push(name);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        fractions: Mutex<Vec<f64>>,
    }

    impl ProgressSink for RecordingProgress {
        fn set_message(&self, _message: &str) {}

        fn set_fraction(&self, fraction: f64) {
            self.fractions.lock().unwrap().push(fraction);
        }
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from(format!("/tmp/{n}"))).collect()
    }

    fn uploader(lister: FakeLister, transport: Arc<RecordingTransport>) -> StageUploader {
        StageUploader::new(Arc::new(lister), transport)
    }

    #[tokio::test]
    async fn transfers_only_missing_files() {
        let transport = Arc::new(RecordingTransport::default());
        let uploader = uploader(
            FakeLister {
                names: vec!["a.csv".to_string()],
            },
            Arc::clone(&transport),
        );
        let outcome = uploader
            .upload(
                "STAGE",
                &paths(&["a.csv", "b.csv"]),
                &PutOptions::default(),
                &NoopProgress,
                &CancelToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.transferred.len(), 1);
        assert_eq!(outcome.transferred[0].remote_name, "b.csv");
        assert_eq!(transport.transferred.lock().unwrap().as_slice(), ["b.csv"]);
    }

    #[tokio::test]
    async fn second_call_transfers_nothing() {
        let transport = Arc::new(RecordingTransport::default());
        let files = paths(&["a.csv", "b.csv"]);
        let first = uploader(FakeLister::default(), Arc::clone(&transport))
            .upload("STAGE", &files, &PutOptions::default(), &NoopProgress, &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(first.transferred.len(), 2);

        // Second call sees the first call's files in the stage listing.
        let listed = FakeLister {
            names: vec!["a.csv".to_string(), "b.csv".to_string()],
        };
        let second = uploader(listed, Arc::clone(&transport))
            .upload("STAGE", &files, &PutOptions::default(), &NoopProgress, &CancelToken::new())
            .await
            .unwrap();
        assert!(second.transferred.is_empty());
        assert_eq!(second.skipped, 2);
        assert_eq!(transport.transferred.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn names_differing_only_by_case_collide() {
        let transport = Arc::new(RecordingTransport::default());
        let outcome = uploader(FakeLister::default(), Arc::clone(&transport))
            .upload(
                "STAGE",
                &paths(&["Model.JAR", "model.jar"]),
                &PutOptions::default(),
                &NoopProgress,
                &CancelToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(outcome.transferred.len(), 1);
        assert_eq!(outcome.transferred[0].remote_name, "Model.JAR");
        assert_eq!(outcome.skipped, 1);
    }

    #[tokio::test]
    async fn listed_names_are_compared_case_insensitively() {
        let transport = Arc::new(RecordingTransport::default());
        let listed = FakeLister {
            names: vec!["MODEL.JAR".to_string()],
        };
        let outcome = uploader(listed, Arc::clone(&transport))
            .upload(
                "STAGE",
                &paths(&["model.jar"]),
                &PutOptions::default(),
                &NoopProgress,
                &CancelToken::new(),
            )
            .await
            .unwrap();
        assert!(outcome.transferred.is_empty());
        assert_eq!(outcome.skipped, 1);
    }

    #[tokio::test]
    async fn progress_is_reported_after_every_file() {
        let transport = Arc::new(RecordingTransport::default());
        let listed = FakeLister {
            names: vec!["a.csv".to_string(), "b.csv".to_string()],
        };
        let progress = RecordingProgress::default();
        uploader(listed, transport)
            .upload(
                "STAGE",
                &paths(&["a.csv", "b.csv", "c.csv", "d.csv"]),
                &PutOptions::default(),
                &progress,
                &CancelToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(progress.fractions.lock().unwrap().as_slice(), [0.25, 0.5, 0.75, 1.0]);
    }

    #[tokio::test]
    async fn failure_reports_files_transferred_before_it() {
        let transport = Arc::new(RecordingTransport {
            transferred: Mutex::new(Vec::new()),
            fail_on: Some("b.csv".to_string()),
        });
        let err = uploader(FakeLister::default(), Arc::clone(&transport))
            .upload(
                "STAGE",
                &paths(&["a.csv", "b.csv", "c.csv"]),
                &PutOptions::default(),
                &NoopProgress,
                &CancelToken::new(),
            )
            .await
            .unwrap_err();
        let transferred: Vec<_> = err.transferred().iter().map(|f| f.remote_name.as_str()).collect();
        assert_eq!(transferred, ["a.csv"]);
        // The file after the failing one is never touched.
        assert_eq!(transport.transferred.lock().unwrap().as_slice(), ["a.csv"]);
        assert!(matches!(err.kind(), UploadErrorKind::Transfer { file, .. } if file == "b.csv"));
    }

    #[tokio::test]
    async fn cancellation_is_observed_between_files() {
        let transport = Arc::new(RecordingTransport::default());
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = uploader(FakeLister::default(), transport)
            .upload(
                "STAGE",
                &paths(&["a.csv"]),
                &PutOptions::default(),
                &NoopProgress,
                &cancel,
            )
            .await
            .unwrap_err();
        assert!(matches!(err.kind(), UploadErrorKind::Cancelled));
        assert!(err.transferred().is_empty());
    }
}
