// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every input can also come from the `INPUT_<NAME>` variable GitHub Actions
//! exports for action inputs, so the same binary serves as the action's main
//! step (`ssm-run run`) and post step (`ssm-run cancel`).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::RawInputs;
use crate::errors::{Result, SsmRunError};
use crate::types::StatusApi;

/// Command-line arguments for `ssm-run`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ssm-run",
    version,
    about = "Run a shell command on an EC2 instance through SSM and report its result.",
    long_about = None
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Optional TOML file with inputs. Flags and `INPUT_*` variables win.
    #[arg(long, global = true, value_name = "PATH", env = "SSM_RUN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Keep the command id in this file instead of the Actions step state.
    #[arg(long, global = true, value_name = "PATH", env = "SSM_RUN_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Level of `ssm-run`'s own diagnostics on stderr.
    ///
    /// Without it, the `SSM_RUN_LOG` filter directive applies (default: info).
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Send the command, wait for it and exit with its exit code.
    Run(InputArgs),
    /// Cancel the command recorded by a previous `run`, if any.
    Cancel(InputArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Target EC2 instance id.
    #[arg(long, env = "INPUT_EC2_INSTANCE_ID")]
    pub ec2_instance_id: Option<String>,

    /// User the commands run as on the instance.
    #[arg(long, env = "INPUT_RUN_AS_USER")]
    pub run_as_user: Option<String>,

    /// Shell commands (multi-line).
    #[arg(long, env = "INPUT_COMMANDS")]
    pub commands: Option<String>,

    /// Bucket SSM writes stdout/stderr to.
    #[arg(long, env = "INPUT_LOG_BUCKET_NAME")]
    pub log_bucket_name: Option<String>,

    /// Key prefix inside the log bucket.
    #[arg(long, env = "INPUT_S3_PREFIX")]
    pub s3_prefix: Option<String>,

    #[arg(long, env = "INPUT_COMMENT")]
    pub comment: Option<String>,

    /// Seconds the script may run on the instance.
    #[arg(long, env = "INPUT_EXECUTION_TIMEOUT")]
    pub execution_timeout: Option<String>,

    #[arg(long, env = "INPUT_POLL_INTERVAL_MS")]
    pub poll_interval_ms: Option<String>,

    /// `invocation` (GetCommandInvocation) or `list` (ListCommandInvocations).
    #[arg(long, env = "INPUT_STATUS_API")]
    pub status_api: Option<String>,

    #[arg(long, env = "INPUT_REGION")]
    pub region: Option<String>,
}

impl InputArgs {
    /// Convert to raw inputs. Numeric and enum inputs arrive as strings
    /// (runners export blank strings for unset inputs) and are parsed here.
    pub fn into_raw(self) -> Result<RawInputs> {
        let poll_interval_ms = match blank_to_none(self.poll_interval_ms) {
            Some(s) => Some(s.parse::<u64>().map_err(|_| {
                SsmRunError::Config(format!("poll_interval_ms must be an integer (got '{s}')"))
            })?),
            None => None,
        };

        let status_api = match blank_to_none(self.status_api) {
            Some(s) => Some(s.parse::<StatusApi>().map_err(SsmRunError::Config)?),
            None => None,
        };

        Ok(RawInputs {
            ec2_instance_id: self.ec2_instance_id,
            run_as_user: self.run_as_user,
            commands: self.commands,
            log_bucket_name: self.log_bucket_name,
            s3_prefix: self.s3_prefix,
            comment: self.comment,
            execution_timeout: self.execution_timeout,
            poll_interval_ms,
            status_api,
            region: self.region,
        })
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
