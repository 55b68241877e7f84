//! Explicit bundler configuration threaded into store and services.
//!
//! # Responsibility
//! - Hold the project directory and file pattern chosen by the caller.
//! - Derive the project label and default archive file name.
//!
//! # Invariants
//! - `project_dir` pointed to an existing directory when the config was built.
//! - The configuration is immutable once an operation starts.

use crate::store::{FilePattern, StoreError, DEFAULT_FILE_PATTERN};
use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Timestamp layout used in default archive names.
pub const ARCHIVE_NAME_DATE_FORMAT: &str = "%Y-%m-%d_%H-%M";
/// Extension of archive files.
pub const ARCHIVE_EXTENSION: &str = "txt";

const FALLBACK_PROJECT_LABEL: &str = "project";

/// Configuration validation error.
#[derive(Debug)]
pub enum ConfigError {
    EmptyProjectDir,
    NotADirectory(PathBuf),
    InvalidPattern(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyProjectDir => write!(f, "project directory cannot be empty"),
            Self::NotADirectory(path) => {
                write!(f, "project directory `{}` is not a directory", path.display())
            }
            Self::InvalidPattern(glob) => write!(f, "invalid file pattern: `{glob}`"),
        }
    }
}

impl Error for ConfigError {}

impl From<StoreError> for ConfigError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::InvalidPattern(glob) => Self::InvalidPattern(glob),
            other => Self::InvalidPattern(other.to_string()),
        }
    }
}

/// Project directory and file selection rules for one bundle/restore run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlerConfig {
    project_dir: PathBuf,
    file_pattern: FilePattern,
}

impl BundlerConfig {
    /// Builds a config for `project_dir` with the default `*.py` pattern.
    ///
    /// # Errors
    /// - `EmptyProjectDir` when the path is empty.
    /// - `NotADirectory` when the path is missing or not a directory.
    pub fn new(project_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let project_dir = project_dir.into();
        if project_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyProjectDir);
        }
        if !project_dir.is_dir() {
            return Err(ConfigError::NotADirectory(project_dir));
        }

        Ok(Self {
            project_dir,
            file_pattern: FilePattern::parse(DEFAULT_FILE_PATTERN)?,
        })
    }

    /// Replaces the file pattern used for bundling.
    pub fn with_pattern(mut self, glob: &str) -> Result<Self, ConfigError> {
        self.file_pattern = FilePattern::parse(glob)?;
        Ok(self)
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn file_pattern(&self) -> &FilePattern {
        &self.file_pattern
    }

    /// Directory name used as the archive label.
    ///
    /// Relative paths such as `.` fall back to the canonical directory name.
    pub fn project_label(&self) -> String {
        self.project_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .or_else(|| self.canonical_name())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| FALLBACK_PROJECT_LABEL.to_string())
    }

    /// Default archive name: `<label>_<YYYY-MM-DD_HH-MM>.txt`.
    pub fn default_archive_name(&self, now: NaiveDateTime) -> String {
        format!(
            "{}_{}.{ARCHIVE_EXTENSION}",
            self.project_label(),
            now.format(ARCHIVE_NAME_DATE_FORMAT)
        )
    }

    /// Default archive path inside the project directory.
    pub fn default_archive_path(&self, now: NaiveDateTime) -> PathBuf {
        self.project_dir.join(self.default_archive_name(now))
    }

    fn canonical_name(&self) -> Option<String> {
        self.project_dir
            .canonicalize()
            .ok()?
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}
