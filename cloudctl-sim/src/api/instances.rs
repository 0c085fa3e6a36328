//! Instance API Handlers
//!
//! HTTP endpoints for the instance lifecycle and tagging.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use cloudctl_core::domain::instance::{Instance, InstanceStateChange};
use cloudctl_core::dto::instance::{CreateTagsRequest, RunInstancesRequest};

use crate::api::error::ApiResult;
use crate::service::instance_service;
use crate::store::Store;

// =============================================================================
// Instance Query
// =============================================================================

/// GET /api/{region}/instances
pub async fn list_instances(
    State(store): State<Store>,
    Path(region): Path<String>,
) -> ApiResult<Json<Vec<Instance>>> {
    tracing::debug!("Listing instances of {}", region);

    let instances = instance_service::list_instances(&store, &region).await?;
    Ok(Json(instances))
}

// =============================================================================
// Instance Lifecycle
// =============================================================================

/// POST /api/{region}/instances
/// Launch instances from an image
pub async fn run_instances(
    State(store): State<Store>,
    Path(region): Path<String>,
    Json(req): Json<RunInstancesRequest>,
) -> ApiResult<Json<Vec<Instance>>> {
    tracing::info!("Launching {} from {} in {}", req.instance_type, req.image_id, region);

    let instances = instance_service::run_instances(&store, &region, req).await?;
    Ok(Json(instances))
}

/// POST /api/{region}/instances/{id}/start
pub async fn start_instance(
    State(store): State<Store>,
    Path((region, id)): Path<(String, String)>,
) -> ApiResult<Json<InstanceStateChange>> {
    tracing::info!("Starting instance {} in {}", id, region);

    let change = instance_service::start_instance(&store, &region, &id).await?;
    Ok(Json(change))
}

/// POST /api/{region}/instances/{id}/stop
pub async fn stop_instance(
    State(store): State<Store>,
    Path((region, id)): Path<(String, String)>,
) -> ApiResult<Json<InstanceStateChange>> {
    tracing::info!("Stopping instance {} in {}", id, region);

    let change = instance_service::stop_instance(&store, &region, &id).await?;
    Ok(Json(change))
}

/// POST /api/{region}/instances/{id}/reboot
pub async fn reboot_instance(
    State(store): State<Store>,
    Path((region, id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    tracing::info!("Rebooting instance {} in {}", id, region);

    instance_service::reboot_instance(&store, &region, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Tags
// =============================================================================

/// POST /api/{region}/tags
pub async fn create_tags(
    State(store): State<Store>,
    Path(region): Path<String>,
    Json(req): Json<CreateTagsRequest>,
) -> ApiResult<StatusCode> {
    tracing::debug!("Tagging {} resource(s) in {}", req.resources.len(), region);

    instance_service::create_tags(&store, &region, req).await?;
    Ok(StatusCode::NO_CONTENT)
}
