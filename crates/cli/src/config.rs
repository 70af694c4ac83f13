//! Command-line and action input configuration.
//!
//! Every option can also be supplied through the environment variable the
//! Actions runner sets for an action input (`INPUT_<NAME>`, upper-cased with
//! hyphens kept), so the binary works unchanged as an action entry point.

use std::path::PathBuf;

use build_info::SlashPolicy;
use clap::{Parser, ValueEnum};

/// Resolve the build identity of the current workflow run and write it to a file.
#[derive(Debug, Parser)]
#[command(name = "gather-build-info", version)]
pub struct Cli {
    /// Path of the file to write. An existing file is never overwritten.
    #[arg(long, env = "INPUT_OUTPUT-NAME")]
    pub output_name: PathBuf,

    /// Output document format.
    #[arg(long, value_enum, env = "INPUT_FORMAT")]
    pub format: OutputFormat,

    /// How `/` in a branch name is rewritten in the build name.
    #[arg(long, value_enum, env = "INPUT_SLASH-POLICY", default_value_t = SlashPolicyArg::All)]
    pub slash_policy: SlashPolicyArg,

    /// Diagnostic log format (written to stderr).
    #[arg(long, value_enum, env = "BUILD_INFO_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Supported output document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON object.
    Json,
}

/// Command-line spelling of [`SlashPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SlashPolicyArg {
    /// Replace every `/` with `__`.
    All,
    /// Replace only the first `/` with `__`.
    FirstOnly,
}

impl From<SlashPolicyArg> for SlashPolicy {
    fn from(arg: SlashPolicyArg) -> Self {
        match arg {
            SlashPolicyArg::All => Self::All,
            SlashPolicyArg::FirstOnly => Self::FirstOnly,
        }
    }
}

/// Diagnostic log formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable single-line events.
    Pretty,
    /// One JSON object per event.
    Json,
}
