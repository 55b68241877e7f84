//! Restoration planner: per-file decisions and their execution.
//!
//! # Responsibility
//! - Decide overwrite/create/ask per archive record for one restore run.
//! - Execute the decisions through a `ProjectStore` and aggregate outcomes.
//!
//! # Invariants
//! - A non-empty selection limits the scope to selected archive filenames.
//! - Existing targets are always overwritten, never confirmed.
//! - Only "no selection + confirm_new_files" consults the confirmer.
//! - Every in-scope file lands in exactly one counter; the batch never aborts.

use crate::model::record::DecodedArchive;
use crate::store::ProjectStore;
use log::{info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// Planned action for one in-scope filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreAction {
    /// Target exists and is replaced.
    Overwrite,
    /// Target is missing and is created without asking.
    Create,
    /// Target is missing; the confirmer decides between create and skip.
    AskThenCreate,
}

/// Final per-file classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreOutcome {
    Overwritten,
    Created,
    Skipped,
    Failed,
}

/// One planned decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRestore {
    pub filename: String,
    pub action: RestoreAction,
}

/// Caller choices for one restore run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreRequest {
    /// Explicit filenames to restore; empty means "all".
    pub selection: Vec<String>,
    /// Ask before creating missing files (only without a selection).
    pub confirm_new_files: bool,
}

impl RestoreRequest {
    /// Restores every archive file.
    pub fn all(confirm_new_files: bool) -> Self {
        Self {
            selection: Vec::new(),
            confirm_new_files,
        }
    }

    /// Restores only `selection`.
    pub fn selected<I, S>(selection: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selection: selection.into_iter().map(Into::into).collect(),
            confirm_new_files: false,
        }
    }
}

/// Per-file write failure kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreFailure {
    pub filename: String,
    pub message: String,
}

/// Aggregated result of one restore run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    pub overwritten: usize,
    pub created: usize,
    pub skipped: usize,
    pub errors: usize,
    /// Details for every file counted in `errors`.
    pub failures: Vec<RestoreFailure>,
}

impl RestoreReport {
    /// Number of files handled in any way.
    pub fn processed(&self) -> usize {
        self.overwritten + self.created + self.skipped + self.errors
    }

    /// `true` when no file was written and nothing failed.
    pub fn is_noop(&self) -> bool {
        self.overwritten == 0 && self.created == 0 && self.errors == 0
    }

    fn record(&mut self, outcome: RestoreOutcome) {
        match outcome {
            RestoreOutcome::Overwritten => self.overwritten += 1,
            RestoreOutcome::Created => self.created += 1,
            RestoreOutcome::Skipped => self.skipped += 1,
            RestoreOutcome::Failed => self.errors += 1,
        }
    }
}

/// Existence status of one archive file in the project directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStatus {
    pub filename: String,
    pub exists: bool,
}

/// Suspension point for ask-then-create decisions.
///
/// The restore loop blocks on `confirm_create` until the collaborator
/// answers for that single file.
pub trait NewFileConfirmer {
    /// Returns `true` to create `filename`, `false` to skip it.
    fn confirm_create(&mut self, filename: &str) -> bool;
}

impl<F> NewFileConfirmer for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm_create(&mut self, filename: &str) -> bool {
        self(filename)
    }
}

/// Pre-collected confirmation answers.
///
/// Filenames without an explicit answer get `default_answer`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedAnswers {
    answers: BTreeMap<String, bool>,
    default_answer: bool,
}

impl PreparedAnswers {
    pub fn new(default_answer: bool) -> Self {
        Self {
            answers: BTreeMap::new(),
            default_answer,
        }
    }

    pub fn answer(mut self, filename: impl Into<String>, create: bool) -> Self {
        self.answers.insert(filename.into(), create);
        self
    }
}

impl NewFileConfirmer for PreparedAnswers {
    fn confirm_create(&mut self, filename: &str) -> bool {
        self.answers
            .get(filename)
            .copied()
            .unwrap_or(self.default_answer)
    }
}

/// Restoration planner over a project store.
pub struct RestoreService<S: ProjectStore> {
    store: S,
}

impl<S: ProjectStore> RestoreService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Filenames the run will touch, in processing order.
    ///
    /// Selected names missing from the archive are dropped; repeated
    /// selections are processed once.
    pub fn scope(&self, archive: &DecodedArchive, request: &RestoreRequest) -> Vec<String> {
        if request.selection.is_empty() {
            return archive.filenames();
        }

        let mut seen = BTreeSet::new();
        let mut scope = Vec::with_capacity(request.selection.len());
        for filename in &request.selection {
            if !archive.contains(filename) {
                warn!(
                    "event=restore_scope module=restore status=skip reason=not_in_archive file={}",
                    filename
                );
                continue;
            }
            if seen.insert(filename.as_str()) {
                scope.push(filename.clone());
            }
        }
        scope
    }

    /// Decision for one filename given the current store state.
    pub fn decide(&self, filename: &str, request: &RestoreRequest) -> RestoreAction {
        if self.store.exists(filename) {
            RestoreAction::Overwrite
        } else if !request.selection.is_empty() || !request.confirm_new_files {
            RestoreAction::Create
        } else {
            RestoreAction::AskThenCreate
        }
    }

    /// Computes every decision without touching the store.
    pub fn plan(&self, archive: &DecodedArchive, request: &RestoreRequest) -> Vec<PlannedRestore> {
        self.scope(archive, request)
            .into_iter()
            .map(|filename| {
                let action = self.decide(&filename, request);
                PlannedRestore { filename, action }
            })
            .collect()
    }

    /// Restores archive records into the store.
    ///
    /// Decisions are taken right before each write so the confirmer sees the
    /// store as it is at that point in the batch.
    pub fn restore<C>(
        &self,
        archive: &DecodedArchive,
        request: &RestoreRequest,
        confirmer: &mut C,
    ) -> RestoreReport
    where
        C: NewFileConfirmer + ?Sized,
    {
        let started_at = Instant::now();
        let scope = self.scope(archive, request);
        info!(
            "event=restore_run module=restore status=start scope={} selection={} confirm_new_files={}",
            scope.len(),
            request.selection.len(),
            request.confirm_new_files
        );

        let mut report = RestoreReport::default();
        for filename in scope {
            let Some(content) = archive.content(&filename) else {
                continue;
            };

            let action = self.decide(&filename, request);
            let outcome = if action == RestoreAction::AskThenCreate
                && !confirmer.confirm_create(&filename)
            {
                RestoreOutcome::Skipped
            } else {
                match self.store.write_file(&filename, content) {
                    Ok(()) if action == RestoreAction::Overwrite => RestoreOutcome::Overwritten,
                    Ok(()) => RestoreOutcome::Created,
                    Err(err) => {
                        report.failures.push(RestoreFailure {
                            filename: filename.clone(),
                            message: err.to_string(),
                        });
                        RestoreOutcome::Failed
                    }
                }
            };
            report.record(outcome);
        }

        let status = if report.errors == 0 { "ok" } else { "partial" };
        info!(
            "event=restore_run module=restore status={} overwritten={} created={} skipped={} errors={} duration_ms={}",
            status,
            report.overwritten,
            report.created,
            report.skipped,
            report.errors,
            started_at.elapsed().as_millis()
        );
        report
    }

    /// Existence status for each filename, in the given order.
    pub fn file_statuses(&self, filenames: &[String]) -> Vec<FileStatus> {
        filenames
            .iter()
            .map(|filename| FileStatus {
                filename: filename.clone(),
                exists: self.store.exists(filename),
            })
            .collect()
    }

    /// Only the filenames that already exist in the store.
    pub fn existing_selection(&self, filenames: &[String]) -> Vec<String> {
        filenames
            .iter()
            .filter(|filename| self.store.exists(filename))
            .cloned()
            .collect()
    }
}
