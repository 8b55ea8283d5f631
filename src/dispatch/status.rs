// src/dispatch/status.rs

//! Normalization of the two SSM status shapes.
//!
//! `GetCommandInvocation` returns status and response code side by side.
//! `ListCommandInvocations` returns a list of invocations; the status sits on
//! the first invocation and the response code on its first plugin. Both are
//! reduced to a [`StatusSnapshot`] here so the controller never sees either.

use crate::command::{SENTINEL_EXIT_CODE, StatusSnapshot};
use crate::types::CommandStatus;

/// Response code SSM reports while the plugin has not finished.
pub const CODE_NOT_YET_AVAILABLE: i32 = -1;

/// The SDK models the response code as a plain `i32` that reads `0` when the
/// field was absent. A code only counts when it comes with a status and is
/// not SSM's "not yet available" marker.
pub fn reported_code(status_present: bool, code: i32) -> Option<i32> {
    (status_present && code != CODE_NOT_YET_AVAILABLE).then_some(code)
}

/// Fields of a `GetCommandInvocation` response that matter to us.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationReport {
    pub status: Option<String>,
    pub response_code: Option<i32>,
}

/// Fields of one entry of a `ListCommandInvocations` response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListedInvocation {
    pub status: Option<String>,
    /// Response code of each plugin, in document order.
    pub plugin_codes: Vec<Option<i32>>,
}

pub fn snapshot_from_invocation(report: &InvocationReport) -> StatusSnapshot {
    StatusSnapshot::new(
        CommandStatus::from_wire(report.status.as_deref()),
        report.response_code,
    )
}

/// An empty listing yields `Unknown` with no code.
pub fn snapshot_from_listing(invocations: &[ListedInvocation]) -> StatusSnapshot {
    match invocations.first() {
        Some(first) => StatusSnapshot::new(
            CommandStatus::from_wire(first.status.as_deref()),
            first.plugin_codes.first().copied().flatten(),
        ),
        None => StatusSnapshot::new(CommandStatus::Unknown, None),
    }
}

/// Pick the exit code from the terminal snapshot and, if one was made, the
/// follow-up query. The follow-up wins when it carries a code.
pub fn resolve_exit_code(terminal: &StatusSnapshot, requery: Option<&StatusSnapshot>) -> i32 {
    requery
        .and_then(|s| s.response_code)
        .or(terminal.response_code)
        .unwrap_or(SENTINEL_EXIT_CODE)
}
