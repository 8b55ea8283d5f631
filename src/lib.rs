// src/lib.rs

pub mod aws;
pub mod cli;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod errors;
pub mod handoff;
pub mod logging;
pub mod logstore;
pub mod report;
pub mod types;
pub mod workflow;

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::cli::{CliArgs, Command, InputArgs};
use crate::command::{CommandRequest, RunVerdict};
use crate::config::{load_cancel_config, load_run_config};
use crate::dispatch::SsmDispatchClient;
use crate::engine::{Controller, ControllerOptions, cancel_recorded};
use crate::errors::Result;
use crate::handoff::open_handoff;
use crate::logstore::S3LogStore;
use crate::report::ActionsReporter;
use crate::types::StatusApi;

/// High-level entry point used by `main.rs`.
///
/// Returns the exit code the process should end with. Errors are fatal
/// failures of the step (bad inputs, SSM rejecting the command, a failed
/// status query), distinct from the remote command exiting non-zero.
pub async fn run(args: CliArgs) -> Result<i32> {
    match args.command {
        Command::Run(inputs) => run_command(args.config.as_deref(), args.state_file, inputs).await,
        Command::Cancel(inputs) => {
            cancel_command(args.config.as_deref(), args.state_file, inputs).await;
            Ok(0)
        }
    }
}

/// `ssm-run run`: dispatch, wait, surface logs, return the remote exit code.
///
/// An interrupt while waiting cancels the in-flight command before failing
/// the step.
async fn run_command(
    config_file: Option<&Path>,
    state_file: Option<PathBuf>,
    inputs: InputArgs,
) -> Result<i32> {
    let cfg = load_run_config(config_file, inputs.into_raw()?)?;
    debug!(?cfg, "resolved run configuration");

    let sdk = aws::load_sdk_config(cfg.region.as_deref()).await;
    let controller = Controller::new(
        SsmDispatchClient::from_sdk_config(&sdk, cfg.status_api),
        S3LogStore::from_sdk_config(&sdk),
        open_handoff(state_file),
        ActionsReporter::from_env(),
        ControllerOptions::from_config(&cfg),
    );

    let outcome = controller
        .run_until(CommandRequest::from_config(&cfg), interrupted())
        .await?;
    Ok(match outcome.verdict {
        RunVerdict::Completed => 0,
        RunVerdict::ExitWith(code) => code,
    })
}

/// `ssm-run cancel`: never fails the step.
async fn cancel_command(config_file: Option<&Path>, state_file: Option<PathBuf>, inputs: InputArgs) {
    let handoff = open_handoff(state_file);
    let reporter = ActionsReporter::from_env();

    let outcome = cancel_recorded(
        &handoff,
        &reporter,
        || {
            inputs
                .into_raw()
                .and_then(|raw| load_cancel_config(config_file, raw))
        },
        |region| async move {
            let sdk = aws::load_sdk_config(region.as_deref()).await;
            SsmDispatchClient::from_sdk_config(&sdk, StatusApi::default())
        },
    )
    .await;
    info!(?outcome, "cancel step finished");
}

/// Resolves on Ctrl-C. If the signal handler cannot be installed, never
/// resolves, so the run carries on uninterrupted.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
