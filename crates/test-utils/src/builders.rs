use ssm_run::command::{CommandRequest, StatusSnapshot};
use ssm_run::config::RawInputs;
use ssm_run::types::CommandStatus;

pub const BUCKET: &str = "ci-ssm-logs";
pub const TARGET: &str = "i-0123456789abcdef0";

/// Shorthand for a status snapshot.
pub fn snapshot(status: &str, code: Option<i32>) -> StatusSnapshot {
    StatusSnapshot::new(CommandStatus::from_wire(Some(status)), code)
}

/// Builder for `CommandRequest` with sensible test defaults.
pub struct RequestBuilder {
    request: CommandRequest,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            request: CommandRequest {
                target_id: TARGET.to_string(),
                run_as_user: "ubuntu".to_string(),
                commands: "echo hello".to_string(),
                execution_timeout: None,
                comment: None,
                log_bucket: BUCKET.to_string(),
                key_prefix: "runs".to_string(),
            },
        }
    }

    pub fn commands(mut self, commands: &str) -> Self {
        self.request.commands = commands.to_string();
        self
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.request.key_prefix = prefix.to_string();
        self
    }

    pub fn target(mut self, target: &str) -> Self {
        self.request.target_id = target.to_string();
        self
    }

    pub fn build(self) -> CommandRequest {
        self.request
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw inputs with every required field filled in.
pub fn complete_inputs() -> RawInputs {
    RawInputs {
        ec2_instance_id: Some(TARGET.to_string()),
        run_as_user: Some("ubuntu".to_string()),
        commands: Some("echo hello".to_string()),
        log_bucket_name: Some(BUCKET.to_string()),
        ..RawInputs::default()
    }
}
