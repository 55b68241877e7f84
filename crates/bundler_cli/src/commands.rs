//! Command handlers: the presentation side of bundle, restore and view.
//!
//! # Responsibility
//! - Turn parsed arguments into core configuration and service calls.
//! - Save archive text and report counters to the user.
//!
//! # Invariants
//! - Nothing is written before the user confirms a restore (unless `--yes`).
//! - Report output goes to `out`; questions go through the prompter.

use crate::args::{BundleArgs, RestoreArgs, ViewArgs};
use crate::prompt::Prompter;
use bundler_core::{
    decode, read_header, ArchiveError, BundleError, BundleService, BundlerConfig, ConfigError,
    FsProjectStore, LoggingError, PlannedRestore, RestoreAction, RestoreReport, RestoreRequest,
    RestoreService,
};
use chrono::Local;
use log::info;
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Failure surfaced to the user by a command.
#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Archive(ArchiveError),
    Bundle(BundleError),
    Logging(LoggingError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Output(std::io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Archive(err) => write!(f, "{err}"),
            Self::Bundle(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Output(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Archive(err) => Some(err),
            Self::Bundle(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<ArchiveError> for CliError {
    fn from(value: ArchiveError) -> Self {
        Self::Archive(value)
    }
}

impl From<BundleError> for CliError {
    fn from(value: BundleError) -> Self {
        Self::Bundle(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Output(value)
    }
}

/// How a command finished when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Completed,
    /// Some files could not be written.
    CompletedWithErrors,
    /// User declined before anything was written.
    Cancelled,
    /// Nothing to do (empty archive or empty selection).
    NothingToDo,
}

/// Bundles the project directory and saves the archive.
pub fn run_bundle(args: &BundleArgs, out: &mut impl Write) -> Result<CommandStatus, CliError> {
    let mut config = BundlerConfig::new(&args.project_dir)?;
    if let Some(pattern) = args.pattern.as_deref() {
        config = config.with_pattern(pattern)?;
    }
    let label = args
        .label
        .clone()
        .unwrap_or_else(|| config.project_label());
    let now = Local::now().naive_local();

    let service = BundleService::new(FsProjectStore::from_config(&config));
    let outcome = service.bundle_at(&label, config.file_pattern(), now)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.default_archive_path(now));
    std::fs::write(&output, outcome.archive_text.as_bytes()).map_err(|source| CliError::Io {
        path: output.clone(),
        source,
    })?;
    info!(
        "event=archive_saved module=cli status=ok files={} path={}",
        outcome.included.len(),
        output.display()
    );

    for name in &outcome.unreadable {
        writeln!(out, "Skipped unreadable file: {name}")?;
    }
    for name in &outcome.nested_archives {
        writeln!(out, "Skipped archive file: {name}")?;
    }
    writeln!(
        out,
        "Saved: {}  ({} files)",
        display_name(&output),
        outcome.included.len()
    )?;
    Ok(CommandStatus::Completed)
}

/// Restores an archive into the project directory.
pub fn run_restore<R: BufRead, W: Write>(
    args: &RestoreArgs,
    out: &mut impl Write,
    prompter: &mut Prompter<R, W>,
) -> Result<CommandStatus, CliError> {
    let config = BundlerConfig::new(&args.project_dir)?;
    let archive = decode(&read_archive(&args.archive)?)?;
    if archive.is_empty() {
        writeln!(out, "No valid files found in {}.", display_name(&args.archive))?;
        return Ok(CommandStatus::NothingToDo);
    }

    let service = RestoreService::new(FsProjectStore::from_config(&config));
    let selection = if args.existing_only {
        let existing = service.existing_selection(&archive.filenames());
        if existing.is_empty() {
            writeln!(out, "None of the archive files exist in the project.")?;
            return Ok(CommandStatus::NothingToDo);
        }
        existing
    } else {
        args.select.clone()
    };
    let request = RestoreRequest {
        selection,
        confirm_new_files: args.confirm_new,
    };

    let plan = service.plan(&archive, &request);
    if plan.is_empty() {
        writeln!(out, "None of the selected files are in the archive.")?;
        return Ok(CommandStatus::NothingToDo);
    }
    if args.dry_run {
        if args.json {
            writeln!(out, "{}", json!({ "dry_run": true, "plan": plan }))?;
        } else {
            write_plan(out, &plan)?;
        }
        return Ok(CommandStatus::Completed);
    }

    if !args.json {
        write_plan(out, &plan)?;
    }
    if !args.assume_yes
        && !prompter.ask(&format!(
            "Restore {} file(s) into {}?",
            plan.len(),
            config.project_dir().display()
        ))
    {
        info!("event=restore_run module=cli status=cancelled");
        if args.json {
            writeln!(out, "{}", json!({ "cancelled": true }))?;
        } else {
            writeln!(out, "Restoration cancelled.")?;
        }
        return Ok(CommandStatus::Cancelled);
    }

    let report = service.restore(&archive, &request, prompter);
    if args.json {
        writeln!(out, "{}", json!({ "report": report }))?;
    } else {
        write_report(out, &report)?;
    }

    if report.errors == 0 {
        Ok(CommandStatus::Completed)
    } else {
        Ok(CommandStatus::CompletedWithErrors)
    }
}

/// Lists the files of an archive, optionally against a project directory.
pub fn run_view(args: &ViewArgs, out: &mut impl Write) -> Result<CommandStatus, CliError> {
    let text = read_archive(&args.archive)?;
    let header = read_header(&text);
    let archive = decode(&text)?;
    let filenames = archive.filenames();

    let statuses = match args.project_dir.as_deref() {
        Some(dir) => {
            let config = BundlerConfig::new(dir)?;
            Some(RestoreService::new(FsProjectStore::from_config(&config)).file_statuses(&filenames))
        }
        None => None,
    };

    if args.json {
        let files = match &statuses {
            Some(statuses) => json!(statuses),
            None => json!(filenames),
        };
        writeln!(
            out,
            "{}",
            json!({
                "archive": args.archive.display().to_string(),
                "header": header,
                "files": files,
            })
        )?;
        return Ok(if filenames.is_empty() {
            CommandStatus::NothingToDo
        } else {
            CommandStatus::Completed
        });
    }

    if let Some(label) = header.label.as_deref() {
        writeln!(out, "Project: {label}")?;
    }
    if let Some(generated_at) = header.generated_at {
        writeln!(out, "Created: {generated_at}")?;
    }
    if filenames.is_empty() {
        writeln!(out, "No valid files found in {}.", display_name(&args.archive))?;
        return Ok(CommandStatus::NothingToDo);
    }

    writeln!(out, "Files in archive:")?;
    match &statuses {
        Some(statuses) => {
            for status in statuses {
                let label = if status.exists {
                    "exists in project"
                } else {
                    "not in project"
                };
                writeln!(out, "  {:<40} {label}", status.filename)?;
            }
        }
        None => {
            for filename in &filenames {
                writeln!(out, "  {filename}")?;
            }
        }
    }
    writeln!(out, "Total: {} files", filenames.len())?;
    if let Some(declared) = header.declared_file_count {
        if declared != filenames.len() {
            writeln!(out, "Header declares {declared} files.")?;
        }
    }
    writeln!(out, "File: {}", display_name(&args.archive))?;
    Ok(CommandStatus::Completed)
}

fn read_archive(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_plan(out: &mut impl Write, plan: &[PlannedRestore]) -> std::io::Result<()> {
    for planned in plan {
        let action = match planned.action {
            RestoreAction::Overwrite => "overwrite",
            RestoreAction::Create => "create",
            RestoreAction::AskThenCreate => "ask",
        };
        writeln!(out, "  {action:<10} {}", planned.filename)?;
    }
    Ok(())
}

fn write_report(out: &mut impl Write, report: &RestoreReport) -> std::io::Result<()> {
    writeln!(out, "Completed.")?;
    if report.is_noop() && report.skipped == 0 {
        writeln!(out, "Nothing was changed.")?;
    }
    if report.overwritten > 0 {
        writeln!(out, "Overwritten existing: {}", report.overwritten)?;
    }
    if report.created > 0 {
        writeln!(out, "Created new: {}", report.created)?;
    }
    if report.skipped > 0 {
        writeln!(out, "Skipped non-existing: {}", report.skipped)?;
    }
    if report.errors > 0 {
        writeln!(out, "Errors: {}", report.errors)?;
        for failure in &report.failures {
            writeln!(out, "  {}: {}", failure.filename, failure.message)?;
        }
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
