// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::types::StatusApi;

/// Default pause between two status queries.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

/// Inputs as supplied by the pipeline, before validation.
///
/// Every field is optional here; the same shape is produced by the CLI layer
/// and by the optional TOML file:
///
/// ```toml
/// ec2_instance_id = "i-0123456789abcdef0"
/// run_as_user = "ubuntu"
/// commands = """
/// cd /srv/app
/// ./deploy.sh
/// """
/// log_bucket_name = "ci-ssm-logs"
/// s3_prefix = "deploys"
/// poll_interval_ms = 2000
/// status_api = "list"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawInputs {
    #[serde(default)]
    pub ec2_instance_id: Option<String>,

    #[serde(default)]
    pub run_as_user: Option<String>,

    /// Multi-line shell commands to run on the instance.
    #[serde(default)]
    pub commands: Option<String>,

    #[serde(default)]
    pub log_bucket_name: Option<String>,

    #[serde(default)]
    pub s3_prefix: Option<String>,

    #[serde(default)]
    pub comment: Option<String>,

    /// Passed through as the document's `executionTimeout` (seconds).
    #[serde(default)]
    pub execution_timeout: Option<String>,

    #[serde(default)]
    pub poll_interval_ms: Option<u64>,

    #[serde(default)]
    pub status_api: Option<StatusApi>,

    /// Overrides the region from the default AWS provider chain.
    #[serde(default)]
    pub region: Option<String>,
}

impl RawInputs {
    /// Fill every field that is unset (or blank) in `self` from `base`.
    ///
    /// Pipeline runners export blank strings for inputs that were not given,
    /// so a blank value never shadows a real one underneath.
    pub fn layered_over(self, base: RawInputs) -> RawInputs {
        RawInputs {
            ec2_instance_id: pick(self.ec2_instance_id, base.ec2_instance_id),
            run_as_user: pick(self.run_as_user, base.run_as_user),
            commands: pick(self.commands, base.commands),
            log_bucket_name: pick(self.log_bucket_name, base.log_bucket_name),
            s3_prefix: pick(self.s3_prefix, base.s3_prefix),
            comment: pick(self.comment, base.comment),
            execution_timeout: pick(self.execution_timeout, base.execution_timeout),
            poll_interval_ms: self.poll_interval_ms.or(base.poll_interval_ms),
            status_api: self.status_api.or(base.status_api),
            region: pick(self.region, base.region),
        }
    }
}

fn pick(top: Option<String>, base: Option<String>) -> Option<String> {
    non_empty(top).or_else(|| non_empty(base))
}

/// `None` for missing or whitespace-only strings.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Validated configuration for `ssm-run run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub ec2_instance_id: String,
    pub run_as_user: String,
    pub commands: String,
    pub log_bucket_name: String,
    /// Empty when no prefix was given.
    pub s3_prefix: String,
    pub comment: Option<String>,
    pub execution_timeout: Option<String>,
    pub poll_interval: Duration,
    pub status_api: StatusApi,
    pub region: Option<String>,
}

/// Validated configuration for `ssm-run cancel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelConfig {
    pub ec2_instance_id: String,
    pub region: Option<String>,
}
