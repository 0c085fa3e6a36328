//! Remote command endpoints
//!
//! Besides the raw endpoints, this module implements the
//! [`CommandSubmitter`] and [`StatusSource`] capabilities on top of them.

use async_trait::async_trait;
use cloudctl_core::domain::command::CommandInvocation;
use cloudctl_core::dto::command::{SendCommandRequest, SendCommandResponse};
use cloudctl_exec::{BoxError, CommandSubmitter, StatusReport, StatusSource};
use reqwest::Method;
use std::collections::HashMap;
use tracing::debug;

use crate::error::Result;
use crate::{ControlPlaneClient, require_id};

impl ControlPlaneClient {
    /// Send an execution document to instances
    pub async fn send_command(&self, req: &SendCommandRequest) -> Result<SendCommandResponse> {
        require_id("document name", &req.document_name)?;
        let url = self.regional_url(&["commands"])?;
        let response = self.request(Method::POST, url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Get one command's invocation on one instance
    pub async fn get_command_invocation(
        &self,
        command_id: &str,
        instance_id: &str,
    ) -> Result<CommandInvocation> {
        require_id("command id", command_id)?;
        require_id("instance id", instance_id)?;
        let url = self.regional_url(&["commands", command_id, "invocations", instance_id])?;
        let response = self.request(Method::GET, url).send().await?;

        self.handle_response(response).await
    }
}

#[async_trait]
impl CommandSubmitter for ControlPlaneClient {
    async fn submit_command(
        &self,
        target: &str,
        document_id: &str,
        parameters: &HashMap<String, Vec<String>>,
    ) -> std::result::Result<Option<String>, BoxError> {
        let response = self
            .send_command(&SendCommandRequest {
                instance_ids: vec![target.to_string()],
                document_name: document_id.to_string(),
                parameters: parameters.clone(),
            })
            .await?;

        Ok(response.command.map(|command| command.command_id))
    }
}

#[async_trait]
impl StatusSource for ControlPlaneClient {
    async fn query_status(
        &self,
        handle: &str,
        target: &str,
    ) -> std::result::Result<StatusReport, BoxError> {
        let invocation = self.get_command_invocation(handle, target).await?;
        debug!(
            "Invocation {} on {} reported {}",
            invocation.command_id, invocation.instance_id, invocation.status
        );

        Ok(StatusReport {
            status: invocation.status,
            stdout: invocation.standard_output_content,
            stderr: invocation.standard_error_content,
        })
    }
}
