// src/handoff/actions.rs

use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use super::HandoffStore;
use crate::errors::{Result, SsmRunError};
use crate::workflow::append_file_command;

/// State key shared by the main and post steps.
pub const STATE_KEY: &str = "ssm-command-id";

/// GitHub Actions step state.
///
/// Saving appends to the file named by `GITHUB_STATE`. The runner exposes the
/// saved value to the post step as the `STATE_ssm-command-id` variable, which
/// seeds the slot. Within one process the last saved id wins over it.
#[derive(Debug, Default)]
pub struct ActionsStateStore {
    state_file: Option<PathBuf>,
    slot: Mutex<Option<String>>,
}

impl ActionsStateStore {
    pub fn new(state_file: Option<PathBuf>, saved: Option<String>) -> Self {
        Self {
            state_file,
            slot: Mutex::new(saved),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            std::env::var_os("GITHUB_STATE").map(PathBuf::from),
            std::env::var(format!("STATE_{STATE_KEY}")).ok(),
        )
    }
}

impl ActionsStateStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.slot
            .lock()
            .map_err(|_| SsmRunError::Handoff("step state slot is poisoned".to_string()))
    }
}

impl HandoffStore for ActionsStateStore {
    fn save(&self, command_id: &str) -> Result<()> {
        let path = self
            .state_file
            .as_ref()
            .ok_or_else(|| SsmRunError::Handoff("GITHUB_STATE is not set".to_string()))?;

        append_file_command(path, STATE_KEY, command_id)
            .map_err(|e| SsmRunError::Handoff(e.to_string()))?;
        *self.lock()? = Some(command_id.to_string());
        debug!(path = %path.display(), command_id, "saved command id to step state");
        Ok(())
    }

    fn load(&self) -> Result<Option<String>> {
        Ok(self.lock()?.clone().filter(|s| !s.trim().is_empty()))
    }
}
