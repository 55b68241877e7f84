//! Project store contract and filesystem-backed implementation.
//!
//! # Responsibility
//! - List, check, read and write files directly inside the project directory.
//! - Report per-file failures so batch callers can aggregate them.
//!
//! # Invariants
//! - Every filename is validated as a single normal path component.
//! - `read_file` maps any failure to `None`; `write_file` returns the error.

use super::FilePattern;
use crate::config::BundlerConfig;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Component, Path, PathBuf};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for listing and writing project files.
#[derive(Debug)]
pub enum StoreError {
    /// Filesystem operation failed for `path`.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Name is empty or would address something outside the directory.
    InvalidFileName(String),
    /// Glob is empty or contains a path separator.
    InvalidPattern(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::InvalidFileName(name) => write!(f, "invalid file name: `{name}`"),
            Self::InvalidPattern(glob) => write!(f, "invalid file pattern: `{glob}`"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidFileName(_) | Self::InvalidPattern(_) => None,
        }
    }
}

/// File access contract scoped to one project directory.
pub trait ProjectStore {
    /// Lists direct child files whose name matches `pattern`.
    fn list_matching(&self, pattern: &FilePattern) -> StoreResult<Vec<String>>;
    /// Whether `filename` exists in the directory.
    fn exists(&self, filename: &str) -> bool;
    /// Creates or truncates `filename` with UTF-8 `content`.
    fn write_file(&self, filename: &str, content: &str) -> StoreResult<()>;
    /// Reads `filename` as UTF-8 text; `None` when it cannot be read.
    fn read_file(&self, filename: &str) -> Option<String>;
}

impl<S: ProjectStore + ?Sized> ProjectStore for &S {
    fn list_matching(&self, pattern: &FilePattern) -> StoreResult<Vec<String>> {
        (**self).list_matching(pattern)
    }

    fn exists(&self, filename: &str) -> bool {
        (**self).exists(filename)
    }

    fn write_file(&self, filename: &str, content: &str) -> StoreResult<()> {
        (**self).write_file(filename, content)
    }

    fn read_file(&self, filename: &str) -> Option<String> {
        (**self).read_file(filename)
    }
}

/// Filesystem-backed project store.
#[derive(Debug, Clone)]
pub struct FsProjectStore {
    root: PathBuf,
}

impl FsProjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a store over the configured project directory.
    pub fn from_config(config: &BundlerConfig) -> Self {
        Self::new(config.project_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, filename: &str) -> StoreResult<PathBuf> {
        if filename.contains(['/', '\\', '\0']) {
            return Err(StoreError::InvalidFileName(filename.to_string()));
        }
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(filename)),
            _ => Err(StoreError::InvalidFileName(filename.to_string())),
        }
    }
}

impl ProjectStore for FsProjectStore {
    fn list_matching(&self, pattern: &FilePattern) -> StoreResult<Vec<String>> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(
                        "event=store_list module=store status=error error_code=dir_entry_failed error={}",
                        err
                    );
                    continue;
                }
            };
            if !entry.path().is_file() {
                continue;
            }
            // Non-UTF-8 names cannot be written into an archive.
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if pattern.matches(&name) {
                names.push(name);
            }
        }
        names.sort();

        info!(
            "event=store_list module=store status=ok pattern={} matched={}",
            pattern,
            names.len()
        );
        Ok(names)
    }

    fn exists(&self, filename: &str) -> bool {
        self.resolve(filename)
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    fn write_file(&self, filename: &str, content: &str) -> StoreResult<()> {
        let path = self.resolve(filename)?;
        match std::fs::write(&path, content.as_bytes()) {
            Ok(()) => {
                debug!(
                    "event=store_write module=store status=ok file={} bytes={}",
                    filename,
                    content.len()
                );
                Ok(())
            }
            Err(source) => {
                warn!(
                    "event=store_write module=store status=error file={} error={}",
                    filename, source
                );
                Err(StoreError::Io { path, source })
            }
        }
    }

    fn read_file(&self, filename: &str) -> Option<String> {
        let path = match self.resolve(filename) {
            Ok(path) => path,
            Err(err) => {
                warn!(
                    "event=store_read module=store status=error file={} error={}",
                    filename, err
                );
                return None;
            }
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(err) => {
                warn!(
                    "event=store_read module=store status=error file={} error={}",
                    filename, err
                );
                None
            }
        }
    }
}
