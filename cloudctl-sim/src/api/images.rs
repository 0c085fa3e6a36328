//! Image API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use cloudctl_core::domain::image::Image;
use cloudctl_core::dto::image::{CreateImageRequest, CreateImageResponse, ImageQuery};

use crate::api::error::ApiResult;
use crate::service::image_service;
use crate::store::Store;

/// GET /api/{region}/images
///
/// Query parameters:
/// - `owner` (optional): owner account id, or `self`
pub async fn list_images(
    State(store): State<Store>,
    Path(region): Path<String>,
    Query(query): Query<ImageQuery>,
) -> ApiResult<Json<Vec<Image>>> {
    tracing::debug!("Listing images of {} (owner: {:?})", region, query.owner);

    let images = image_service::list_images(&store, &region, query.owner.as_deref()).await?;
    Ok(Json(images))
}

/// POST /api/{region}/images
pub async fn create_image(
    State(store): State<Store>,
    Path(region): Path<String>,
    Json(req): Json<CreateImageRequest>,
) -> ApiResult<Json<CreateImageResponse>> {
    tracing::info!("Creating image {} from {}", req.name, req.instance_id);

    let response = image_service::create_image(&store, &region, req).await?;
    Ok(Json(response))
}
