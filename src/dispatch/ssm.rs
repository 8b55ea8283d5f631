// src/dispatch/ssm.rs

//! `CommandDispatch` on top of AWS Systems Manager.

use aws_config::SdkConfig;
use aws_sdk_ssm::Client;
use aws_sdk_ssm::error::DisplayErrorContext;
use tracing::{debug, info};

use super::CommandDispatch;
use super::status::{
    InvocationReport, ListedInvocation, reported_code, resolve_exit_code,
    snapshot_from_invocation, snapshot_from_listing,
};
use crate::command::{CommandHandle, CommandRequest, StatusSnapshot};
use crate::errors::{Result, SsmRunError};
use crate::types::{BoxFuture, StatusApi};

const RUN_SHELL_DOCUMENT: &str = "AWS-RunShellScript";
const RUN_SHELL_PLUGIN: &str = "aws:runShellScript";

/// How long SSM waits for the agent to pick the command up. This is not the
/// script's own run time (`executionTimeout`).
const PICKUP_TIMEOUT_SECONDS: i32 = 300;

pub struct SsmDispatchClient {
    client: Client,
    api: StatusApi,
}

impl SsmDispatchClient {
    pub fn new(client: Client, api: StatusApi) -> Self {
        Self { client, api }
    }

    pub fn from_sdk_config(config: &SdkConfig, api: StatusApi) -> Self {
        Self::new(Client::new(config), api)
    }

    async fn get_invocation(&self, handle: &CommandHandle) -> Result<StatusSnapshot> {
        let out = self
            .client
            .get_command_invocation()
            .command_id(&handle.command_id)
            .instance_id(&handle.target_id)
            .plugin_name(RUN_SHELL_PLUGIN)
            .send()
            .await
            .map_err(|e| SsmRunError::PollQuery(DisplayErrorContext(&e).to_string()))?;

        let status = out.status().map(|s| s.as_str().to_string());
        let report = InvocationReport {
            response_code: reported_code(status.is_some(), out.response_code()),
            status,
        };
        Ok(snapshot_from_invocation(&report))
    }

    async fn list_invocations(&self, handle: &CommandHandle) -> Result<StatusSnapshot> {
        let out = self
            .client
            .list_command_invocations()
            .command_id(&handle.command_id)
            .instance_id(&handle.target_id)
            .details(true)
            .send()
            .await
            .map_err(|e| SsmRunError::PollQuery(DisplayErrorContext(&e).to_string()))?;

        let listed: Vec<ListedInvocation> = out
            .command_invocations
            .unwrap_or_default()
            .into_iter()
            .map(|inv| ListedInvocation {
                status: inv.status.map(|s| s.as_str().to_string()),
                plugin_codes: inv
                    .command_plugins
                    .unwrap_or_default()
                    .into_iter()
                    .map(|p| reported_code(p.status.is_some(), p.response_code))
                    .collect(),
            })
            .collect();
        Ok(snapshot_from_listing(&listed))
    }
}

impl CommandDispatch for SsmDispatchClient {
    fn submit<'a>(&'a self, request: &'a CommandRequest) -> BoxFuture<'a, Result<CommandHandle>> {
        Box::pin(async move {
            let mut send = self
                .client
                .send_command()
                .instance_ids(&request.target_id)
                .document_name(RUN_SHELL_DOCUMENT)
                .timeout_seconds(PICKUP_TIMEOUT_SECONDS)
                .parameters("commands", vec![request.script()])
                .output_s3_bucket_name(&request.log_bucket);

            if let Some(ref timeout) = request.execution_timeout {
                send = send.parameters("executionTimeout", vec![timeout.clone()]);
            }
            if let Some(ref comment) = request.comment {
                send = send.comment(comment);
            }
            if !request.key_prefix.is_empty() {
                send = send.output_s3_key_prefix(&request.key_prefix);
            }

            let out = send
                .send()
                .await
                .map_err(|e| SsmRunError::Dispatch(DisplayErrorContext(&e).to_string()))?;

            let command_id = out
                .command()
                .and_then(|c| c.command_id())
                .ok_or_else(|| {
                    SsmRunError::Dispatch("response did not contain a command id".to_string())
                })?;

            info!(
                command_id,
                target = %request.target_id,
                "command accepted by SSM"
            );
            Ok(CommandHandle::new(command_id, &request.target_id))
        })
    }

    fn poll_status<'a>(&'a self, handle: &'a CommandHandle) -> BoxFuture<'a, Result<StatusSnapshot>> {
        Box::pin(async move {
            match self.api {
                StatusApi::Invocation => self.get_invocation(handle).await,
                StatusApi::List => self.list_invocations(handle).await,
            }
        })
    }

    fn resolve_exit_code<'a>(
        &'a self,
        handle: &'a CommandHandle,
        terminal: &'a StatusSnapshot,
    ) -> BoxFuture<'a, Result<i32>> {
        Box::pin(async move {
            match self.api {
                StatusApi::Invocation => Ok(resolve_exit_code(terminal, None)),
                StatusApi::List => {
                    // The listing can report a terminal status before the
                    // plugin result is filled in; read it once more.
                    debug!(command_id = %handle.command_id, "re-querying for plugin exit code");
                    let requery = self.list_invocations(handle).await?;
                    Ok(resolve_exit_code(terminal, Some(&requery)))
                }
            }
        })
    }

    fn cancel<'a>(&'a self, handle: &'a CommandHandle) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.client
                .cancel_command()
                .command_id(&handle.command_id)
                .instance_ids(&handle.target_id)
                .send()
                .await
                .map_err(|e| SsmRunError::Cancel(DisplayErrorContext(&e).to_string()))?;
            Ok(())
        })
    }
}
