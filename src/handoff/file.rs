// src/handoff/file.rs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::HandoffStore;
use crate::errors::{Result, SsmRunError};

/// Slot backed by a plain file, for use outside GitHub Actions.
#[derive(Debug, Clone)]
pub struct FileHandoffStore {
    path: PathBuf,
}

impl FileHandoffStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HandoffStore for FileHandoffStore {
    fn save(&self, command_id: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| SsmRunError::Handoff(format!("creating {parent:?}: {e}")))?;
            }
        }
        fs::write(&self.path, command_id)
            .map_err(|e| SsmRunError::Handoff(format!("writing {:?}: {e}", self.path)))
    }

    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let id = contents.trim();
                Ok((!id.is_empty()).then(|| id.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SsmRunError::Handoff(format!("reading {:?}: {e}", self.path))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHandoffStore::new(dir.path().join("slot"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn later_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHandoffStore::new(dir.path().join("nested").join("slot"));

        store.save("first").unwrap();
        store.save("second").unwrap();

        assert_eq!(store.load().unwrap().as_deref(), Some("second"));
    }
}
