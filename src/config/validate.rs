// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{
    CancelConfig, DEFAULT_POLL_INTERVAL_MS, RawInputs, RunConfig, non_empty,
};
use crate::errors::{Result, SsmRunError};

impl TryFrom<RawInputs> for RunConfig {
    type Error = SsmRunError;

    fn try_from(raw: RawInputs) -> std::result::Result<Self, Self::Error> {
        let ec2_instance_id = required(raw.ec2_instance_id, "ec2_instance_id")?
            .trim()
            .to_string();
        let run_as_user = required(raw.run_as_user, "run_as_user")?.trim().to_string();
        let commands = required(raw.commands, "commands")?;
        let log_bucket_name = required(raw.log_bucket_name, "log_bucket_name")?
            .trim()
            .to_string();

        validate_user(&run_as_user)?;

        let execution_timeout = non_empty(raw.execution_timeout)
            .map(|t| t.trim().to_string());
        if let Some(ref timeout) = execution_timeout {
            validate_execution_timeout(timeout)?;
        }

        let poll_interval_ms = raw.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        if poll_interval_ms == 0 {
            return Err(SsmRunError::Config(
                "poll_interval_ms must be >= 1 (got 0)".to_string(),
            ));
        }

        Ok(RunConfig {
            ec2_instance_id,
            run_as_user,
            commands,
            log_bucket_name,
            s3_prefix: non_empty(raw.s3_prefix).unwrap_or_default(),
            comment: non_empty(raw.comment),
            execution_timeout,
            poll_interval: Duration::from_millis(poll_interval_ms),
            status_api: raw.status_api.unwrap_or_default(),
            region: non_empty(raw.region),
        })
    }
}

impl TryFrom<RawInputs> for CancelConfig {
    type Error = SsmRunError;

    fn try_from(raw: RawInputs) -> std::result::Result<Self, Self::Error> {
        Ok(CancelConfig {
            ec2_instance_id: required(raw.ec2_instance_id, "ec2_instance_id")?
                .trim()
                .to_string(),
            region: non_empty(raw.region),
        })
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    non_empty(value)
        .ok_or_else(|| SsmRunError::Config(format!("Input required and not supplied: {name}")))
}

/// The user name is interpolated into the remote `sudo -u` line unquoted.
fn validate_user(user: &str) -> Result<()> {
    let ok = user
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '$'));
    if !ok {
        return Err(SsmRunError::Config(format!(
            "run_as_user '{user}' is not a valid user name"
        )));
    }
    Ok(())
}

fn validate_execution_timeout(timeout: &str) -> Result<()> {
    if !timeout.chars().all(|c| c.is_ascii_digit()) {
        return Err(SsmRunError::Config(format!(
            "execution_timeout must be a number of seconds (got '{timeout}')"
        )));
    }
    Ok(())
}
