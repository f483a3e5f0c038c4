//! # frostline-loader
//!
//! Bulk loading of local data files into a table of the remote engine:
//! - **Settings**: intermediate file format, compression and stage selection
//!   as supplied by the host configuration layer
//! - **Formats**: per-format transfer and copy-in option rendering (CSV,
//!   Parquet)
//! - **Executor**: stage, copy-in with purge-on-success, best-effort
//!   compensating cleanup on failure
//!
//! A load job is consumed once and never retried automatically; on failure
//! the caller decides whether to re-invoke.

pub mod error;
pub mod executor;
pub mod format;
pub mod settings;

// Re-export commonly used types
pub use error::{LoadError, Result};
pub use executor::{BulkLoader, LoadJob};
pub use format::{CsvOptions, FileFormat};
pub use settings::{LoaderSettings, StageSelection};
