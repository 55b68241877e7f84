//! Project file store abstractions and filesystem implementation.
//!
//! # Responsibility
//! - Define the narrow file access contract used by bundle/restore services.
//! - Keep every file operation inside one configured project directory.
//!
//! # Invariants
//! - Operations are non-recursive and address files by plain name only.
//! - Names that could escape the directory are rejected, never resolved.
//! - Per-file read/write failures are returned as values, never panics.

pub mod pattern;
pub mod project_store;

pub use pattern::{FilePattern, DEFAULT_FILE_PATTERN};
pub use project_store::{FsProjectStore, ProjectStore, StoreError, StoreResult};
