//! Command-line argument parsing.
//!
//! Builds the `clap::Command` tree and converts its matches into typed
//! per-command arguments.
//!
//! # Invariants
//! - Global options (`--log-level`, `--log-dir`) are accepted anywhere.
//! - Options not valid for the chosen command are rejected, not ignored.
//! - `--select` and `--existing-only` are mutually exclusive.

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};
use std::ffi::OsString;
use std::path::PathBuf;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

const RESTORE_POLICY_HELP: &str = "\
Restore policy:
  no --select        restore every archive file
  --select / --existing-only
                     restore only those files, creating missing ones without asking
  --confirm-new      without a selection, ask before creating files that do not exist";

/// Logging switches shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    pub log_level: Option<String>,
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleArgs {
    pub project_dir: PathBuf,
    pub output: Option<PathBuf>,
    pub pattern: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreArgs {
    pub project_dir: PathBuf,
    pub archive: PathBuf,
    pub select: Vec<String>,
    pub existing_only: bool,
    pub confirm_new: bool,
    pub dry_run: bool,
    pub assume_yes: bool,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewArgs {
    pub archive: PathBuf,
    pub project_dir: Option<PathBuf>,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Bundle(BundleArgs),
    Restore(RestoreArgs),
    View(ViewArgs),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub global: GlobalOptions,
    pub command: Command,
}

/// Build the complete command tree.
pub fn build_cli() -> ClapCommand {
    ClapCommand::new("project-bundler")
        .about("Bundle project files into one text archive and restore them")
        .version(bundler_core::core_version())
        .subcommand_required(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .value_parser(LOG_LEVELS)
                .help("Log level for file logging")
                .global(true),
        )
        .arg(
            Arg::new("log-dir")
                .long("log-dir")
                .value_name("DIR")
                .help("Absolute directory for rolling log files")
                .global(true),
        )
        .subcommand(build_bundle())
        .subcommand(build_restore())
        .subcommand(build_view())
}

fn build_bundle() -> ClapCommand {
    ClapCommand::new("bundle")
        .about("Write matching project files into one archive")
        .arg(
            Arg::new("project-dir")
                .required(true)
                .value_name("PROJECT_DIR"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("FILE")
                .help("Archive path (default: <dir>_<timestamp>.txt inside the project)"),
        )
        .arg(
            Arg::new("pattern")
                .long("pattern")
                .value_name("GLOB")
                .help("File name pattern (default: *.py)"),
        )
        .arg(
            Arg::new("label")
                .long("label")
                .value_name("NAME")
                .help("Archive label (default: project directory name)"),
        )
}

fn build_restore() -> ClapCommand {
    ClapCommand::new("restore")
        .about("Write archive files back into a project directory")
        .after_help(RESTORE_POLICY_HELP)
        .arg(
            Arg::new("project-dir")
                .required(true)
                .value_name("PROJECT_DIR"),
        )
        .arg(Arg::new("archive").required(true).value_name("ARCHIVE"))
        .arg(
            Arg::new("select")
                .long("select")
                .value_name("NAMES")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .conflicts_with("existing-only")
                .help("Comma-separated file names to restore"),
        )
        .arg(
            Arg::new("existing-only")
                .long("existing-only")
                .action(ArgAction::SetTrue)
                .help("Restore only archive files already present in the project"),
        )
        .arg(
            Arg::new("confirm-new")
                .long("confirm-new")
                .action(ArgAction::SetTrue)
                .help("Ask before creating files that do not exist"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Print the plan without writing"),
        )
        .arg(
            Arg::new("yes")
                .long("yes")
                .short('y')
                .action(ArgAction::SetTrue)
                .help("Do not ask before starting"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("JSON output"),
        )
}

fn build_view() -> ClapCommand {
    ClapCommand::new("view")
        .about("List the files of an archive")
        .arg(Arg::new("archive").required(true).value_name("ARCHIVE"))
        .arg(
            Arg::new("project")
                .long("project")
                .value_name("DIR")
                .help("Show whether each file exists in this directory"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("JSON output"),
        )
}

/// Parses a full argument vector, program name first.
///
/// Help and version requests come back as `clap::Error` values whose
/// `exit()` prints them with a success status.
pub fn parse_args<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_cli().try_get_matches_from(args)?;
    matches_to_invocation(&matches)
}

fn matches_to_invocation(matches: &ArgMatches) -> Result<Invocation, clap::Error> {
    let global = GlobalOptions {
        log_level: matches.get_one::<String>("log-level").cloned(),
        log_dir: matches.get_one::<String>("log-dir").cloned(),
    };

    let command = match matches.subcommand() {
        Some(("bundle", m)) => Command::Bundle(BundleArgs {
            project_dir: path_arg(m, "project-dir"),
            output: m.get_one::<String>("output").map(PathBuf::from),
            pattern: m.get_one::<String>("pattern").cloned(),
            label: m.get_one::<String>("label").cloned(),
        }),
        Some(("restore", m)) => Command::Restore(RestoreArgs {
            project_dir: path_arg(m, "project-dir"),
            archive: path_arg(m, "archive"),
            select: selection(m),
            existing_only: m.get_flag("existing-only"),
            confirm_new: m.get_flag("confirm-new"),
            dry_run: m.get_flag("dry-run"),
            assume_yes: m.get_flag("yes"),
            json: m.get_flag("json"),
        }),
        Some(("view", m)) => Command::View(ViewArgs {
            archive: path_arg(m, "archive"),
            project_dir: m.get_one::<String>("project").map(PathBuf::from),
            json: m.get_flag("json"),
        }),
        _ => {
            return Err(clap::Error::raw(
                ErrorKind::MissingSubcommand,
                "missing command\n",
            ))
        }
    };

    Ok(Invocation { global, command })
}

fn path_arg(matches: &ArgMatches, id: &str) -> PathBuf {
    matches
        .get_one::<String>(id)
        .map(PathBuf::from)
        .unwrap_or_default()
}

fn selection(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>("select")
        .map(|values| {
            values
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
