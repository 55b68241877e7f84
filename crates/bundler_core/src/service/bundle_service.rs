//! Bundle use-case service.
//!
//! # Responsibility
//! - Collect matching project files through a `ProjectStore`.
//! - Encode them into archive text for the caller to save.
//!
//! # Invariants
//! - Unreadable files are left out of the archive and reported, not fatal.
//! - Files that are archives themselves are never nested into a new one.
//! - An outcome always holds at least one file; otherwise the run fails.
//! - The service never writes the archive file itself.

use crate::archive::{encode, encode_at, HEADER_TITLE};
use crate::store::{FilePattern, ProjectStore, StoreError};
use chrono::NaiveDateTime;
use log::{error, info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for bundling.
#[derive(Debug)]
pub enum BundleError {
    /// No project file matched the pattern.
    NoMatchingFiles(String),
    /// Files matched, but none of them could go into an archive.
    NoReadableFiles(Vec<String>),
    /// Listing the project directory failed.
    Store(StoreError),
}

impl Display for BundleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMatchingFiles(pattern) => write!(f, "no files matching `{pattern}` found"),
            Self::NoReadableFiles(names) => {
                write!(f, "none of the matching files could be bundled: {}", names.join(", "))
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BundleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::NoMatchingFiles(_) | Self::NoReadableFiles(_) => None,
        }
    }
}

impl From<StoreError> for BundleError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Archive text plus what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOutcome {
    /// Encoded archive, ready to be saved by the caller.
    pub archive_text: String,
    /// Filenames included in the archive, sorted.
    pub included: Vec<String>,
    /// Matching filenames that could not be read.
    pub unreadable: Vec<String>,
    /// Matching filenames skipped because they hold archive text.
    pub nested_archives: Vec<String>,
}

/// Bundling facade over a project store.
pub struct BundleService<S: ProjectStore> {
    store: S,
}

impl<S: ProjectStore> BundleService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Bundles every file matching `pattern`, stamped with the current time.
    pub fn bundle(
        &self,
        project_label: &str,
        pattern: &FilePattern,
    ) -> Result<BundleOutcome, BundleError> {
        self.bundle_with(project_label, pattern, |files| encode(project_label, files))
    }

    /// Same as [`bundle`](Self::bundle) with an explicit header timestamp.
    pub fn bundle_at(
        &self,
        project_label: &str,
        pattern: &FilePattern,
        generated_at: NaiveDateTime,
    ) -> Result<BundleOutcome, BundleError> {
        self.bundle_with(project_label, pattern, |files| {
            encode_at(project_label, files, generated_at)
        })
    }

    fn bundle_with(
        &self,
        project_label: &str,
        pattern: &FilePattern,
        encoder: impl FnOnce(&BTreeMap<String, String>) -> String,
    ) -> Result<BundleOutcome, BundleError> {
        let started_at = Instant::now();
        info!(
            "event=bundle_run module=bundle status=start label={} pattern={}",
            project_label, pattern
        );

        let names = match self.store.list_matching(pattern) {
            Ok(names) => names,
            Err(err) => {
                error!(
                    "event=bundle_run module=bundle status=error error_code=list_failed error={}",
                    err
                );
                return Err(err.into());
            }
        };
        if names.is_empty() {
            info!(
                "event=bundle_run module=bundle status=empty pattern={}",
                pattern
            );
            return Err(BundleError::NoMatchingFiles(pattern.to_string()));
        }

        let mut files = BTreeMap::new();
        let mut unreadable = Vec::new();
        let mut nested_archives = Vec::new();
        for name in names {
            match self.store.read_file(&name) {
                Some(content) if content.starts_with(HEADER_TITLE) => {
                    warn!(
                        "event=bundle_read module=bundle status=skip reason=archive file={}",
                        name
                    );
                    nested_archives.push(name);
                }
                Some(content) => {
                    files.insert(name, content);
                }
                None => {
                    warn!(
                        "event=bundle_read module=bundle status=skip reason=unreadable file={}",
                        name
                    );
                    unreadable.push(name);
                }
            }
        }

        if files.is_empty() {
            let skipped = unreadable
                .into_iter()
                .chain(nested_archives)
                .collect::<Vec<_>>();
            error!(
                "event=bundle_run module=bundle status=error error_code=nothing_readable skipped={}",
                skipped.len()
            );
            return Err(BundleError::NoReadableFiles(skipped));
        }

        let archive_text = encoder(&files);
        let included = files.into_keys().collect::<Vec<_>>();
        info!(
            "event=bundle_run module=bundle status=ok included={} unreadable={} nested_archives={} bytes={} duration_ms={}",
            included.len(),
            unreadable.len(),
            nested_archives.len(),
            archive_text.len(),
            started_at.elapsed().as_millis()
        );

        Ok(BundleOutcome {
            archive_text,
            included,
            unreadable,
            nested_archives,
        })
    }
}
