//! Build-info CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: action inputs from flags or `INPUT_*`
//!    variables (see [`config`]).
//! 2. **Wire observability**: install a `tracing-subscriber` writing to
//!    stderr in pretty or JSON form.
//! 3. **Resolve**: read the runner environment through
//!    [`github::ActionsEnvironment`] and resolve it with
//!    [`build_info::EventResolver`].
//! 4. **Write**: render the JSON document and create the output file,
//!    never overwriting an existing one.
//!
//! Any failure, including invalid or missing inputs, is reported as an
//! `::error::` workflow command and a non-zero exit status.

use std::process::ExitCode;

use anyhow::{Context, Result};
use build_info::{resolve_from_source, TriggerSource};
use clap::error::ErrorKind;
use clap::Parser;
use github::ActionsEnvironment;
use tracing::error;

mod config;
mod observability;
mod output;
mod workflow_command;

use config::Cli;
use output::WriteOutcome;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let Some(message) = input_failure_message(&e) else {
                e.exit()
            };
            let _ = e.print();
            workflow_command::set_failed(&message);
            return ExitCode::FAILURE;
        }
    };
    observability::init(cli.log_format);

    match run(&cli, &ActionsEnvironment::from_process_env()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            let message = format!("{e:#}");
            error!(error = %message, "Failed to gather build information");
            workflow_command::set_failed(&message);
            ExitCode::FAILURE
        }
    }
}

/// Message to report for an argument error, or `None` when clap is only
/// printing help or version text.
fn input_failure_message(err: &clap::Error) -> Option<String> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => None,
        _ => Some(err.to_string().trim_end().to_string()),
    }
}

fn run<S: TriggerSource>(cli: &Cli, source: &S) -> Result<WriteOutcome> {
    let info = resolve_from_source(source, cli.slash_policy.into())
        .context("Failed to resolve build information")?;
    let document = output::render(&info, cli.format)?;
    output::write_new(&cli.output_name, &document)
}
