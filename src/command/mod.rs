// src/command/mod.rs

//! Value types that flow through one run.
//!
//! - [`request`] builds the immutable [`CommandRequest`] and the remote shell
//!   wrapper around the user's commands.
//! - [`paths`] derives the S3 keys the `AWS-RunShellScript` document writes
//!   its output to.

pub mod paths;
pub mod request;

pub use paths::LogPaths;
pub use request::{CommandRequest, wrap_script};

use crate::types::CommandStatus;

/// Exit code used when the service never reported one.
pub const SENTINEL_EXIT_CODE: i32 = 255;

/// A command that SSM accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHandle {
    pub command_id: String,
    pub target_id: String,
}

impl CommandHandle {
    pub fn new(command_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            command_id: command_id.into(),
            target_id: target_id.into(),
        }
    }
}

/// Normalized result of a single status query, whichever SSM API produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub status: CommandStatus,
    pub response_code: Option<i32>,
}

impl StatusSnapshot {
    pub fn new(status: CommandStatus, response_code: Option<i32>) -> Self {
        Self {
            status,
            response_code,
        }
    }
}

/// Terminal status plus the resolved exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub status: CommandStatus,
    pub exit_code: i32,
}

impl CommandOutcome {
    /// The exit code is compared in its string form, so only a literal `0`
    /// counts as success.
    pub fn succeeded(&self) -> bool {
        self.exit_code.to_string() == "0"
    }
}

/// Remote output fetched after the command finished. Either side may be
/// missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogPair {
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

/// What the process should do once the run is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunVerdict {
    /// Remote exit code was `0`; return normally.
    Completed,
    /// Remote command failed; terminate the process with this code.
    ExitWith(i32),
}
