//! # frostline-commons
//!
//! Shared building blocks for the Frostline loader and function deployment
//! crates:
//! - Column and table models used by both the bulk loader and the UDF builder
//! - Collaborator traits for the remote session (statement execution, stage
//!   file listing, file transfer)
//! - The SQL dialect facade for identifier quoting and name composition
//! - Progress reporting and cooperative cancellation primitives
//!
//! Everything in this crate is purely local: no network calls, no engine
//! specifics beyond the textual dialect rules.

pub mod dialect;
pub mod errors;
pub mod models;
pub mod progress;
pub mod remote;
pub mod util;

// Re-export commonly used types
pub use dialect::{Dialect, StandardDialect};
pub use errors::RemoteOperationError;
pub use models::{Column, Compression, LogicalType, TableRef};
pub use progress::{CancelToken, Cancelled, NoopProgress, ProgressSink};
pub use remote::{FileTransport, PutOptions, RemoteFileLister, StatementExecutor};
pub use util::format_byte_size;
