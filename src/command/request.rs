// src/command/request.rs

use crate::config::RunConfig;

/// Everything needed to send one command. Built once from [`RunConfig`] and
/// consumed by the dispatch client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub target_id: String,
    pub run_as_user: String,
    /// The user's commands, unwrapped.
    pub commands: String,
    pub execution_timeout: Option<String>,
    pub comment: Option<String>,
    pub log_bucket: String,
    pub key_prefix: String,
}

impl CommandRequest {
    pub fn from_config(cfg: &RunConfig) -> Self {
        Self {
            target_id: cfg.ec2_instance_id.clone(),
            run_as_user: cfg.run_as_user.clone(),
            commands: cfg.commands.clone(),
            execution_timeout: cfg.execution_timeout.clone(),
            comment: cfg.comment.clone(),
            log_bucket: cfg.log_bucket_name.clone(),
            key_prefix: cfg.s3_prefix.clone(),
        }
    }

    /// The script actually sent as the `commands` document parameter.
    pub fn script(&self) -> String {
        wrap_script(&self.run_as_user, &self.commands)
    }
}

/// Wrap `commands` so they run as `user` under `bash`, with stderr folded
/// into stdout and both shells stopping on the first failing line.
///
/// The heredoc delimiter is quoted so nothing in `commands` is expanded by the
/// outer shell.
pub fn wrap_script(user: &str, commands: &str) -> String {
    format!(
        "\nset -e\nsudo -u {user} bash <<'INNER'\nset -e\nexec 2>&1\n{commands}\nINNER\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapper_runs_as_user_and_merges_stderr() {
        let script = wrap_script("deploy", "echo hi\nexit 3");
        assert_eq!(
            script,
            "\nset -e\nsudo -u deploy bash <<'INNER'\nset -e\nexec 2>&1\necho hi\nexit 3\nINNER\n"
        );
    }

    #[test]
    fn commands_are_not_expanded_by_outer_shell() {
        let script = wrap_script("ubuntu", "echo $HOME");
        assert!(script.contains("<<'INNER'"));
        assert!(script.contains("echo $HOME\n"));
    }
}
