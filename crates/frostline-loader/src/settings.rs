//! Loader settings supplied by the host configuration layer.

use frostline_commons::{Compression, Dialect, TableRef};
use serde::{Deserialize, Serialize};

use crate::error::{LoadError, Result};
use crate::format::{CsvOptions, FileFormat};

/// Which staging area a load job stages its files into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageSelection {
    /// A named internal stage in the target table's namespace.
    Internal { name: String },
    /// The table's own stage.
    Table,
    /// The session user's stage.
    User,
}

/// Settings for one bulk load job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderSettings {
    pub file_format: FileFormat,
    pub compression: Compression,
    pub stage: StageSelection,
    /// Required when `file_format` is CSV.
    pub csv: Option<CsvOptions>,
}

impl LoaderSettings {
    /// Rejects combinations the loader cannot execute.
    pub fn validate(&self) -> Result<()> {
        if self.file_format == FileFormat::Csv && self.csv.is_none() {
            return Err(LoadError::InvalidSettings(
                "CSV format requires CSV options".to_string(),
            ));
        }
        if !self
            .file_format
            .supported_compressions()
            .contains(&self.compression)
        {
            return Err(LoadError::InvalidSettings(format!(
                "compression {:?} is not supported for {:?} files",
                self.compression, self.file_format
            )));
        }
        Ok(())
    }
}

/// Renders the stage reference used in transfer, copy and remove commands
/// (without the leading `@`).
pub(crate) fn stage_reference(
    selection: &StageSelection,
    table: &TableRef,
    dialect: &dyn Dialect,
) -> String {
    let [catalog, schema, _] = table.parts();
    match selection {
        StageSelection::Internal { name } => dialect.create_full_name(&[catalog, schema, name]),
        StageSelection::Table => {
            // The `%` marker sits between the namespace and the delimited
            // table name.
            let namespace = dialect.create_full_name(&[catalog, schema]);
            let table_name = dialect.delimit(&table.name);
            if namespace.is_empty() {
                format!("%{table_name}")
            } else {
                format!("{namespace}.%{table_name}")
            }
        }
        StageSelection::User => "~".to_string(),
    }
}
