//! Core data models shared by the loader and the UDF builder.

use serde::{Deserialize, Serialize};

/// Identity of a table in the remote engine.
///
/// Catalog and schema are optional; rendering into SQL is the dialect's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    /// Creates an unqualified table reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: name.into(),
        }
    }

    /// Creates a fully qualified table reference.
    pub fn qualified(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            catalog: Some(catalog.into()),
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    /// Name parts in catalog, schema, name order, with absent parts as "".
    pub fn parts(&self) -> [&str; 3] {
        [
            self.catalog.as_deref().unwrap_or(""),
            self.schema.as_deref().unwrap_or(""),
            &self.name,
        ]
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for part in [&self.catalog, &self.schema].into_iter().flatten() {
            write!(f, "{part}.")?;
        }
        write!(f, "{}", self.name)
    }
}

/// Logical column types supported at the loader/UDF boundary.
///
/// Columns of any other shape must be converted by the caller before they
/// reach this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalType {
    Integer,
    BigInt,
    Double,
    Varchar,
    /// Fixed-length vector of doubles, e.g. an embedding.
    DoubleArray,
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub logical_type: LogicalType,
}

impl Column {
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            logical_type,
        }
    }
}

/// Compression codecs understood by the remote engine for staged files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compression {
    None,
    Gzip,
    Snappy,
}

impl Compression {
    /// The codec name as spelled in engine commands.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Compression::None => "NONE",
            Compression::Gzip => "GZIP",
            Compression::Snappy => "SNAPPY",
        }
    }
}
