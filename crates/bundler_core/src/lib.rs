//! Core logic for the project bundler.
//! Archive text format, project file store and restoration policy live here;
//! presentation layers only call into this crate.

pub mod archive;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use archive::{decode, encode, encode_at, read_header, ArchiveError, ArchiveHeader};
pub use config::{BundlerConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::record::{ArchiveRecord, DecodedArchive};
pub use service::bundle_service::{BundleError, BundleOutcome, BundleService};
pub use service::restore_service::{
    FileStatus, NewFileConfirmer, PlannedRestore, PreparedAnswers, RestoreAction, RestoreFailure,
    RestoreReport, RestoreRequest, RestoreService,
};
pub use store::{FilePattern, FsProjectStore, ProjectStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
