//! Command API Handlers
//!
//! HTTP endpoints for remote command execution.

use axum::{
    Json,
    extract::{Path, State},
};
use cloudctl_core::domain::command::CommandInvocation;
use cloudctl_core::dto::command::{SendCommandRequest, SendCommandResponse};

use crate::api::error::ApiResult;
use crate::service::command_service;
use crate::store::Store;

/// POST /api/{region}/commands
/// Accept a command for one or more instances
pub async fn send_command(
    State(store): State<Store>,
    Path(region): Path<String>,
    Json(req): Json<SendCommandRequest>,
) -> ApiResult<Json<SendCommandResponse>> {
    tracing::info!(
        "Sending {} to {:?} in {}",
        req.document_name,
        req.instance_ids,
        region
    );

    let response = command_service::send_command(&store, &region, req).await?;
    Ok(Json(response))
}

/// GET /api/{region}/commands/{command_id}/invocations/{instance_id}
pub async fn get_invocation(
    State(store): State<Store>,
    Path((region, command_id, instance_id)): Path<(String, String, String)>,
) -> ApiResult<Json<CommandInvocation>> {
    let invocation =
        command_service::get_invocation(&store, &region, &command_id, &instance_id).await?;
    Ok(Json(invocation))
}
