// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{CancelConfig, RawInputs, RunConfig};
use crate::errors::Result;

/// Read a TOML inputs file. No validation beyond deserialization.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawInputs> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let inputs: RawInputs = toml::from_str(&contents)?;

    Ok(inputs)
}

/// Layer the command-line/environment inputs over the optional file.
pub fn resolve_inputs(file: Option<&Path>, cli: RawInputs) -> Result<RawInputs> {
    match file {
        Some(path) => {
            debug!(path = %path.display(), "loading inputs file");
            let base = load_from_path(path)?;
            Ok(cli.layered_over(base))
        }
        None => Ok(cli),
    }
}

pub fn load_run_config(file: Option<&Path>, cli: RawInputs) -> Result<RunConfig> {
    RunConfig::try_from(resolve_inputs(file, cli)?)
}

pub fn load_cancel_config(file: Option<&Path>, cli: RawInputs) -> Result<CancelConfig> {
    CancelConfig::try_from(resolve_inputs(file, cli)?)
}
