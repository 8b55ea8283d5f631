// src/logging.rs

//! Diagnostics for `ssm-run` via `tracing` + `tracing-subscriber`.
//!
//! STDOUT belongs to the workflow commands and the remote command's output,
//! so diagnostics always go to STDERR, without ANSI colours (CI log viewers
//! render them as noise).
//!
//! Filter selection:
//! 1. `--log-level` sets the level of `ssm-run`'s own events;
//! 2. otherwise `SSM_RUN_LOG` is read as a full filter directive
//!    (e.g. `debug` or `ssm_run=trace,aws_smithy_runtime=debug`);
//! 3. otherwise `ssm-run` logs at info.
//!
//! Outside an explicit `SSM_RUN_LOG` directive, the AWS SDK crates only
//! report warnings and errors.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable holding a filter directive.
pub const LOG_ENV: &str = "SSM_RUN_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_directive = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env_directive.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    Ok(())
}

fn build_filter(cli_level: Option<LogLevel>, env_directive: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return own_events_at(level.as_str());
    }

    env_directive
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| own_events_at("info"))
}

fn own_events_at(level: &str) -> EnvFilter {
    EnvFilter::new(format!("warn,ssm_run={level}"))
}
