//! Region API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use cloudctl_core::domain::region::{AvailabilityZone, Region};

use crate::api::error::ApiResult;
use crate::service::region_service;
use crate::store::Store;

/// GET /api/regions
pub async fn list_regions(State(store): State<Store>) -> Json<Vec<Region>> {
    tracing::debug!("Listing regions");

    Json(region_service::list_regions(&store).await)
}

/// GET /api/{region}/zones
pub async fn list_zones(
    State(store): State<Store>,
    Path(region): Path<String>,
) -> ApiResult<Json<Vec<AvailabilityZone>>> {
    tracing::debug!("Listing zones of {}", region);

    let zones = region_service::list_zones(&store, &region).await?;
    Ok(Json(zones))
}
