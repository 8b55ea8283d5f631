// src/dispatch/mod.rs

//! Command dispatch layer.
//!
//! The lifecycle controller talks to a [`CommandDispatch`] instead of the SSM
//! client directly, so tests can script status sequences without AWS.
//!
//! - [`status`] normalizes the two SSM response shapes into a
//!   [`StatusSnapshot`](crate::command::StatusSnapshot) and resolves the
//!   final exit code.
//! - [`ssm`] is the production implementation on top of `aws-sdk-ssm`.

pub mod ssm;
pub mod status;

pub use ssm::SsmDispatchClient;

use crate::command::{CommandHandle, CommandRequest, StatusSnapshot};
use crate::errors::Result;
use crate::types::BoxFuture;

/// Operations the controller and the cancel handler need from the
/// command-execution service.
pub trait CommandDispatch: Send + Sync {
    /// Send the wrapped script to the request's target.
    ///
    /// Errors are [`SsmRunError::Dispatch`](crate::errors::SsmRunError::Dispatch).
    fn submit<'a>(&'a self, request: &'a CommandRequest) -> BoxFuture<'a, Result<CommandHandle>>;

    /// Query the current status once.
    ///
    /// Errors are [`SsmRunError::PollQuery`](crate::errors::SsmRunError::PollQuery).
    fn poll_status<'a>(&'a self, handle: &'a CommandHandle) -> BoxFuture<'a, Result<StatusSnapshot>>;

    /// Turn the first terminal snapshot into the exit code to report.
    ///
    /// The default trusts the terminal snapshot and falls back to the
    /// sentinel. Backends whose status query may lag behind the plugin result
    /// override this to query again.
    fn resolve_exit_code<'a>(
        &'a self,
        _handle: &'a CommandHandle,
        terminal: &'a StatusSnapshot,
    ) -> BoxFuture<'a, Result<i32>> {
        Box::pin(async move { Ok(status::resolve_exit_code(terminal, None)) })
    }

    /// Ask the service to stop the command. Already-finished commands are not
    /// an error for the caller.
    fn cancel<'a>(&'a self, handle: &'a CommandHandle) -> BoxFuture<'a, Result<()>>;
}
