//! Local artifact resolution.

use std::path::{Path, PathBuf};

use crate::error::{Result, UdfError};

/// Resolves a logical dependency name to a local artifact file.
///
/// When several versions of the same artifact are available, the highest
/// version wins.
pub trait ArtifactRegistry: Send + Sync {
    fn resolve(&self, logical_name: &str) -> Result<PathBuf>;
}

/// Registry backed by a flat directory of versioned artifact files.
///
/// Files are expected to be named `<logical-name>-<version>.<ext>` (e.g.
/// `genmodel-3.42.0.jar`); an unversioned `<logical-name>.<ext>` matches
/// with the lowest possible version.
pub struct DirectoryRegistry {
    root: PathBuf,
}

impl DirectoryRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactRegistry for DirectoryRegistry {
    fn resolve(&self, logical_name: &str) -> Result<PathBuf> {
        let entries = std::fs::read_dir(&self.root)
            .map_err(|_| UdfError::DependencyResolution(logical_name.to_string()))?;
        let mut best: Option<(Vec<u32>, PathBuf)> = None;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(version) = version_of(&path, logical_name) else {
                continue;
            };
            match &best {
                Some((current, _)) if *current >= version => {}
                _ => best = Some((version, path)),
            }
        }
        best.map(|(_, path)| path)
            .ok_or_else(|| UdfError::DependencyResolution(logical_name.to_string()))
    }
}

/// Extracts the version of a candidate file for `logical_name`, or `None`
/// if the file does not belong to that artifact.
fn version_of(path: &Path, logical_name: &str) -> Option<Vec<u32>> {
    let stem = path.file_stem()?.to_str()?;
    if stem == logical_name {
        return Some(Vec::new());
    }
    let suffix = stem.strip_prefix(logical_name)?.strip_prefix('-')?;
    parse_version(suffix)
}

/// Parses a dotted numeric version such as `3.42.0`. Non-numeric input is
/// rejected so `foo-bar.jar` never matches artifact `foo`.
fn parse_version(text: &str) -> Option<Vec<u32>> {
    text.split('.').map(|part| part.parse::<u32>().ok()).collect()
}
