// src/handoff/mod.rs

//! Single-slot store carrying the command id from `run` to `cancel`.
//!
//! The two entry points run in separate processes. `run` writes the slot
//! right after SSM accepts the command; `cancel` reads it. A later write
//! replaces an earlier one.

pub mod actions;
pub mod file;

pub use actions::{ActionsStateStore, STATE_KEY};
pub use file::FileHandoffStore;

use crate::errors::Result;

pub trait HandoffStore: Send + Sync {
    /// Overwrite the slot with `command_id`.
    fn save(&self, command_id: &str) -> Result<()>;

    /// Current slot content; `None` when nothing was ever saved.
    fn load(&self) -> Result<Option<String>>;
}

impl<T: HandoffStore + ?Sized> HandoffStore for Box<T> {
    fn save(&self, command_id: &str) -> Result<()> {
        (**self).save(command_id)
    }

    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }
}

/// Plain-file slot when a path is given, GitHub Actions step state otherwise.
pub fn open_handoff(state_file: Option<std::path::PathBuf>) -> Box<dyn HandoffStore> {
    match state_file.filter(|p| !p.as_os_str().is_empty()) {
        Some(path) => Box::new(FileHandoffStore::new(path)),
        None => Box::new(ActionsStateStore::from_env()),
    }
}
