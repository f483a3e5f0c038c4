//! Staging area model.

use std::path::PathBuf;

/// Lifetime class of a staging area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Session-scoped; dropped by the engine when the session ends.
    Ephemeral,
    /// Persists across jobs; shared, e.g. as a dependency cache.
    Named,
    /// Persists and is keyed by one artifact's name, so re-deployments of
    /// the same artifact find their files already staged.
    PerArtifact,
}

/// A provisioned staging area.
///
/// `scope` holds the namespace parts the stage was created in (empty for
/// stages addressed relative to the session's current namespace).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    name: String,
    kind: StageKind,
    scope: Vec<String>,
    reference: String,
}

impl Stage {
    pub(crate) fn new(name: &str, kind: StageKind, scope: &[&str], reference: String) -> Self {
        Self {
            name: name.to_string(),
            kind,
            scope: scope.iter().map(|s| s.to_string()).collect(),
            reference,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    /// The stage reference as used in transfer, list and copy commands,
    /// without the leading `@`.
    pub fn reference(&self) -> &str {
        &self.reference
    }
}

/// A file that was transferred into a staging area by an upload call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub local_path: PathBuf,
    pub stage: String,
    pub remote_name: String,
}
