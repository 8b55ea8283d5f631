// src/command/paths.rs

use super::CommandHandle;

/// Plugin directory the `AWS-RunShellScript` document writes under.
const PLUGIN_DIR: &str = "awsrunShellScript/0.awsrunShellScript";

/// S3 keys of the captured output for one command on one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPaths {
    base: String,
}

impl LogPaths {
    /// `<prefix>/<commandId>/<targetId>/awsrunShellScript/0.awsrunShellScript`
    ///
    /// An empty prefix yields a key without a leading `/`, which is where SSM
    /// writes when no `OutputS3KeyPrefix` was sent.
    pub fn new(prefix: &str, handle: &CommandHandle) -> Self {
        let base = if prefix.is_empty() {
            format!("{}/{}/{PLUGIN_DIR}", handle.command_id, handle.target_id)
        } else {
            format!(
                "{prefix}/{}/{}/{PLUGIN_DIR}",
                handle.command_id, handle.target_id
            )
        };
        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn stdout(&self) -> String {
        format!("{}/stdout", self.base)
    }

    pub fn stderr(&self) -> String {
        format!("{}/stderr", self.base)
    }
}
