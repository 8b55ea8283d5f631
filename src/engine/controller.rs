// src/engine/controller.rs

//! The command lifecycle state machine.
//!
//! ```text
//! Submitted --sleep+poll--> Polling --(Pending|InProgress|Delayed)--> Polling
//!                              |
//!                              +--(anything else, incl. Unknown)--> Terminal
//! ```
//!
//! Once terminal the controller fetches the output objects, resolves the
//! exit code and turns it into a [`RunVerdict`]. It never terminates the
//! process itself.

use std::future::Future;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::cancel::CancelHandler;
use super::{ControllerOptions, EXIT_CODE_OUTPUT, LifecycleState, RunOutcome};
use crate::command::{
    CommandHandle, CommandOutcome, CommandRequest, LogPair, LogPaths, RunVerdict, StatusSnapshot,
};
use crate::dispatch::CommandDispatch;
use crate::errors::{Result, SsmRunError};
use crate::handoff::HandoffStore;
use crate::logstore::LogStore;
use crate::report::Reporter;

pub struct Controller<D, L, H, R> {
    dispatch: D,
    logs: L,
    handoff: H,
    reporter: R,
    options: ControllerOptions,
}

impl<D, L, H, R> Controller<D, L, H, R>
where
    D: CommandDispatch,
    L: LogStore,
    H: HandoffStore,
    R: Reporter,
{
    pub fn new(dispatch: D, logs: L, handoff: H, reporter: R, options: ControllerOptions) -> Self {
        Self {
            dispatch,
            logs,
            handoff,
            reporter,
            options,
        }
    }

    /// Cancel handler sharing this controller's collaborators, for use when
    /// the run itself is interrupted.
    pub fn cancel_handler(&self, target_id: impl Into<String>) -> CancelHandler<'_, D, H, R> {
        CancelHandler::new(&self.dispatch, &self.handoff, &self.reporter, target_id)
    }

    /// Run one command to completion.
    ///
    /// Only dispatch and status-query failures are returned as errors. A
    /// non-zero remote exit code is reported through the returned verdict.
    pub async fn run(&self, request: CommandRequest) -> Result<RunOutcome> {
        self.reporter.info("Sending command to remote server...");
        let handle = self.dispatch.submit(&request).await?;
        self.hand_off(&handle);

        info!(
            command_id = %handle.command_id,
            target = %handle.target_id,
            state = ?LifecycleState::Submitted,
            "command submitted"
        );
        self.reporter.info(&format!("Command ID: {}", handle.command_id));
        self.reporter.info("Waiting for command to finish...");

        let terminal = self.wait_for_terminal(&handle).await?;

        let paths = LogPaths::new(&request.key_prefix, &handle);
        let logs = self.surface_logs(&request.log_bucket, &paths).await;

        let exit_code = self.dispatch.resolve_exit_code(&handle, &terminal).await?;
        let outcome = CommandOutcome {
            status: terminal.status,
            exit_code,
        };
        let verdict = self.publish(&outcome);

        Ok(RunOutcome {
            handle,
            outcome,
            logs,
            verdict,
        })
    }

    /// [`run`](Self::run), racing against `interrupt`.
    ///
    /// If `interrupt` resolves first, the command recorded in the handoff slot
    /// is cancelled and the run fails with [`SsmRunError::Interrupted`].
    pub async fn run_until<F>(&self, request: CommandRequest, interrupt: F) -> Result<RunOutcome>
    where
        F: Future<Output = ()>,
    {
        let target_id = request.target_id.clone();

        tokio::select! {
            res = self.run(request) => res,
            _ = interrupt => {
                warn!(target = %target_id, "interrupted while waiting for the remote command; cancelling it");
                let cancelled = self.cancel_handler(target_id).run().await;
                debug!(?cancelled, "interrupt cancellation finished");
                Err(SsmRunError::Interrupted)
            }
        }
    }

    /// Save the command id for the cancel entry point. The command is already
    /// running remotely at this point, so a failure only costs us the ability
    /// to cancel.
    fn hand_off(&self, handle: &CommandHandle) {
        if let Err(err) = self.handoff.save(&handle.command_id) {
            warn!(
                command_id = %handle.command_id,
                error = %err,
                "could not save command id; cancellation will not reach this command"
            );
            self.reporter
                .warning(&format!("Could not save command id for cancellation: {err}"));
        }
    }

    /// Sleep, query, repeat until the first terminal status.
    async fn wait_for_terminal(&self, handle: &CommandHandle) -> Result<StatusSnapshot> {
        let mut state = LifecycleState::Submitted;

        loop {
            sleep(self.options.poll_interval).await;

            let snapshot = self.dispatch.poll_status(handle).await?;
            self.reporter
                .info(&format!("Command status: {}", snapshot.status));

            let next = LifecycleState::after(&snapshot.status);
            if next != state {
                debug!(
                    command_id = %handle.command_id,
                    from = ?state,
                    to = ?next,
                    status = %snapshot.status,
                    "lifecycle transition"
                );
                state = next;
            }

            if state == LifecycleState::Terminal {
                return Ok(snapshot);
            }
        }
    }

    async fn surface_logs(&self, bucket: &str, paths: &LogPaths) -> LogPair {
        self.reporter.start_group("Remote stdout");
        let stdout = self.fetch(bucket, &paths.stdout()).await;
        match stdout {
            Some(ref text) => self.reporter.info(text),
            None => self.reporter.warning("No stdout found"),
        }
        self.reporter.end_group();

        self.reporter.start_group("Remote stderr");
        let stderr = self.fetch(bucket, &paths.stderr()).await;
        if let Some(ref text) = stderr {
            self.reporter.warning(text);
        }
        self.reporter.end_group();

        LogPair { stdout, stderr }
    }

    /// Empty objects and fetch failures both count as "no log".
    async fn fetch(&self, bucket: &str, key: &str) -> Option<String> {
        match self.logs.fetch_text(bucket, key).await {
            Ok(Some(text)) if !text.is_empty() => Some(text),
            Ok(_) => None,
            Err(err) => {
                debug!(bucket, key, error = %err, "unable to fetch log object");
                None
            }
        }
    }

    fn publish(&self, outcome: &CommandOutcome) -> RunVerdict {
        let code = outcome.exit_code.to_string();

        if let Err(err) = self.reporter.set_output(EXIT_CODE_OUTPUT, &code) {
            warn!(error = %err, "failed to publish exit code output");
        }
        self.reporter.info(&format!("Exit code: {code}"));

        info!(
            status = %outcome.status,
            exit_code = outcome.exit_code,
            state = ?LifecycleState::Terminal,
            "command finished"
        );

        if outcome.succeeded() {
            RunVerdict::Completed
        } else {
            self.reporter
                .error(&format!("Remote command failed with exit code: {code}"));
            RunVerdict::ExitWith(outcome.exit_code)
        }
    }
}
