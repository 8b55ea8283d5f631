// src/engine/mod.rs

//! Command lifecycle engine.
//!
//! - [`controller`] drives one command from submission to the exit verdict.
//! - [`cancel`] is the best-effort companion used when the step is
//!   interrupted.
//!
//! Both only see the collaborator traits (`CommandDispatch`, `LogStore`,
//! `HandoffStore`, `Reporter`); the AWS- and Actions-backed implementations
//! are wired in `lib.rs`.

use std::time::Duration;

use crate::command::{CommandHandle, CommandOutcome, LogPair, RunVerdict};
use crate::config::RunConfig;
use crate::types::CommandStatus;

pub mod cancel;
pub mod controller;

pub use cancel::{CancelHandler, CancelOutcome, cancel_recorded};
pub use controller::Controller;

/// Name of the step output carrying the remote exit code.
pub const EXIT_CODE_OUTPUT: &str = "command-exit-code";

/// Where a command is in its lifecycle, from the controller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Submitted,
    Polling,
    Terminal,
}

impl LifecycleState {
    /// State after observing `status`.
    pub fn after(status: &CommandStatus) -> Self {
        if status.is_terminal() {
            LifecycleState::Terminal
        } else {
            LifecycleState::Polling
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ControllerOptions {
    /// Pause before each status query.
    pub poll_interval: Duration,
}

impl ControllerOptions {
    pub fn from_config(cfg: &RunConfig) -> Self {
        Self {
            poll_interval: cfg.poll_interval,
        }
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub handle: CommandHandle,
    pub outcome: CommandOutcome,
    pub logs: LogPair,
    pub verdict: RunVerdict,
}
