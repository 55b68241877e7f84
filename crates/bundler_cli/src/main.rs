//! `project-bundler` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, start optional file logging, dispatch commands.
//! - Map command results to process exit codes.

mod args;
mod commands;
mod prompt;

use args::{Command, GlobalOptions, Invocation};
use commands::{CliError, CommandStatus};
use prompt::Prompter;
use std::process::ExitCode;

fn main() -> ExitCode {
    // clap exits with status 2 on usage errors and 0 for --help/--version
    let invocation = match args::parse_args(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(err) => err.exit(),
    };

    match run(invocation) {
        Ok(CommandStatus::CompletedWithErrors) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=command module=cli status=error error={}", err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(invocation: Invocation) -> Result<CommandStatus, CliError> {
    if let Some(log_dir) = invocation.global.log_dir.as_deref() {
        bundler_core::init_logging(log_level(&invocation.global), log_dir)?;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match invocation.command {
        Command::Bundle(args) => commands::run_bundle(&args, &mut out),
        Command::Restore(args) => {
            let stdin = std::io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), std::io::stderr());
            commands::run_restore(&args, &mut out, &mut prompter)
        }
        Command::View(args) => commands::run_view(&args, &mut out),
    }
}

fn log_level(global: &GlobalOptions) -> &str {
    global
        .log_level
        .as_deref()
        .unwrap_or_else(|| bundler_core::default_log_level())
}

#[cfg(test)]
mod tests {
    use super::log_level;
    use crate::args::GlobalOptions;

    #[test]
    fn log_level_prefers_explicit_option() {
        let global = GlobalOptions {
            log_level: Some("warn".to_string()),
            log_dir: None,
        };
        assert_eq!(log_level(&global), "warn");
    }

    #[test]
    fn log_level_falls_back_to_build_default() {
        let global = GlobalOptions::default();
        let level = log_level(&global);
        assert_eq!(level, bundler_core::default_log_level());
    }
}
