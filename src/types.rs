use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::Deserialize;

/// Boxed future returned by the collaborator traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Execution status of a dispatched command, as reported by SSM.
///
/// `Unknown` is synthetic: it stands for a response that carried no status at
/// all. Values SSM may add later are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStatus {
    Pending,
    InProgress,
    Delayed,
    Success,
    Cancelled,
    Cancelling,
    TimedOut,
    Failed,
    Other(String),
    Unknown,
}

impl CommandStatus {
    /// Normalize an optional wire value. A missing status becomes `Unknown`.
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some(s) => s.parse().unwrap_or(CommandStatus::Unknown),
            None => CommandStatus::Unknown,
        }
    }

    /// Polling stops on anything other than the three waiting states.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            CommandStatus::Pending | CommandStatus::InProgress | CommandStatus::Delayed
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            CommandStatus::Pending => "Pending",
            CommandStatus::InProgress => "InProgress",
            CommandStatus::Delayed => "Delayed",
            CommandStatus::Success => "Success",
            CommandStatus::Cancelled => "Cancelled",
            CommandStatus::Cancelling => "Cancelling",
            CommandStatus::TimedOut => "TimedOut",
            CommandStatus::Failed => "Failed",
            CommandStatus::Other(s) => s,
            CommandStatus::Unknown => "Unknown",
        }
    }
}

impl FromStr for CommandStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Pending" => CommandStatus::Pending,
            "InProgress" => CommandStatus::InProgress,
            "Delayed" => CommandStatus::Delayed,
            "Success" => CommandStatus::Success,
            "Cancelled" => CommandStatus::Cancelled,
            "Cancelling" => CommandStatus::Cancelling,
            "TimedOut" => CommandStatus::TimedOut,
            "Failed" => CommandStatus::Failed,
            "" | "Unknown" => CommandStatus::Unknown,
            other => CommandStatus::Other(other.to_string()),
        })
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which SSM query is used to observe a command.
///
/// - `Invocation`: `GetCommandInvocation`, status and response code come back
///   directly (default).
/// - `List`: `ListCommandInvocations` with details; the response code lives on
///   the first plugin of the first invocation and is re-read once the command
///   is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusApi {
    Invocation,
    List,
}

impl Default for StatusApi {
    fn default() -> Self {
        StatusApi::Invocation
    }
}

impl FromStr for StatusApi {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "invocation" => Ok(StatusApi::Invocation),
            "list" => Ok(StatusApi::List),
            other => Err(format!(
                "invalid status_api: {other} (expected \"invocation\" or \"list\")"
            )),
        }
    }
}
