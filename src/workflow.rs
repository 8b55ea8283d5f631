// src/workflow.rs

//! GitHub Actions workflow-command formatting.
//!
//! Two mechanisms are used:
//! - workflow commands printed on stdout (`::warning::msg`, `::group::name`);
//! - file commands appended to the files named by `GITHUB_OUTPUT` and
//!   `GITHUB_STATE`, in the multi-line `name<<delimiter` form.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use uuid::Uuid;

use crate::errors::{Result, SsmRunError};

/// Escape message data for a workflow command.
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// `::<command>::<escaped message>`
pub fn format_command(command: &str, message: &str) -> String {
    format!("::{command}::{}", escape_data(message))
}

/// Render one `name<<delimiter` block for a file command.
pub fn format_file_command(name: &str, value: &str, delimiter: &str) -> Result<String> {
    if name.contains(delimiter) || value.contains(delimiter) {
        return Err(SsmRunError::Other(anyhow::anyhow!(
            "value for '{name}' contains the file-command delimiter"
        )));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

/// Append `name=value` to a file-command file such as `GITHUB_OUTPUT`.
pub fn append_file_command(path: &Path, name: &str, value: &str) -> Result<()> {
    let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
    let block = format_file_command(name, value, &delimiter)?;

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(block.as_bytes())?;
    Ok(())
}
