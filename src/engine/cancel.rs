// src/engine/cancel.rs

//! Best-effort cancellation of the command recorded in the handoff slot.

use std::future::Future;

use tracing::{debug, info, warn};

use crate::command::CommandHandle;
use crate::config::CancelConfig;
use crate::dispatch::CommandDispatch;
use crate::errors::{Result, SsmRunError};
use crate::handoff::HandoffStore;
use crate::report::Reporter;

/// What a cancellation attempt amounted to. Never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The slot was empty; no request was sent.
    NothingToCancel,
    /// SSM accepted the cancel request for this command id.
    Cancelled(String),
    /// Something went wrong; it was reported as a warning.
    Failed(String),
}

pub struct CancelHandler<'a, D, H, R> {
    dispatch: &'a D,
    handoff: &'a H,
    reporter: &'a R,
    target_id: String,
}

impl<'a, D, H, R> CancelHandler<'a, D, H, R>
where
    D: CommandDispatch,
    H: HandoffStore,
    R: Reporter,
{
    pub fn new(dispatch: &'a D, handoff: &'a H, reporter: &'a R, target_id: impl Into<String>) -> Self {
        Self {
            dispatch,
            handoff,
            reporter,
            target_id: target_id.into(),
        }
    }

    pub async fn run(&self) -> CancelOutcome {
        match load_slot(self.handoff, self.reporter) {
            Ok(command_id) => self.cancel_id(command_id).await,
            Err(outcome) => outcome,
        }
    }

    /// Cancel `command_id` on this handler's target, bypassing the slot.
    pub async fn cancel_id(&self, command_id: String) -> CancelOutcome {
        let handle = CommandHandle::new(command_id, &self.target_id);
        match self.dispatch.cancel(&handle).await {
            Ok(()) => {
                info!(
                    command_id = %handle.command_id,
                    target = %handle.target_id,
                    "cancel requested"
                );
                self.reporter
                    .info(&format!("Cancelled command: {}", handle.command_id));
                CancelOutcome::Cancelled(handle.command_id)
            }
            Err(err) => report_failure(self.reporter, err),
        }
    }
}

/// The standalone cancel step.
///
/// Inputs are resolved and the dispatch client is connected only once the
/// slot holds an id: an empty slot is a silent no-op that neither validates
/// inputs nor touches the network.
pub async fn cancel_recorded<D, H, R, C, F, Fut>(
    handoff: &H,
    reporter: &R,
    resolve_config: C,
    connect: F,
) -> CancelOutcome
where
    D: CommandDispatch,
    H: HandoffStore,
    R: Reporter,
    C: FnOnce() -> Result<CancelConfig>,
    F: FnOnce(Option<String>) -> Fut,
    Fut: Future<Output = D>,
{
    let command_id = match load_slot(handoff, reporter) {
        Ok(id) => id,
        Err(outcome) => return outcome,
    };

    let cfg = match resolve_config() {
        Ok(cfg) => cfg,
        Err(err) => return report_failure(reporter, err),
    };

    let dispatch = connect(cfg.region).await;
    CancelHandler::new(&dispatch, handoff, reporter, cfg.ec2_instance_id)
        .cancel_id(command_id)
        .await
}

fn load_slot<H: HandoffStore, R: Reporter>(
    handoff: &H,
    reporter: &R,
) -> std::result::Result<String, CancelOutcome> {
    match handoff.load() {
        Ok(Some(id)) => Ok(id),
        Ok(None) => {
            debug!("no command id in handoff slot; nothing to cancel");
            Err(CancelOutcome::NothingToCancel)
        }
        Err(err) => Err(report_failure(reporter, err)),
    }
}

fn report_failure<R: Reporter>(reporter: &R, err: SsmRunError) -> CancelOutcome {
    let message = match err {
        SsmRunError::Cancel(msg) => msg,
        other => other.to_string(),
    };
    warn!(error = %message, "cancellation failed");
    reporter.warning(&format!("Failed to cancel command: {message}"));
    CancelOutcome::Failed(message)
}
