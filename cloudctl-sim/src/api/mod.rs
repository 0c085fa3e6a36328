//! API Module
//!
//! HTTP API layer of the emulator.
//! Each submodule handles endpoints for a specific resource kind.

pub mod commands;
pub mod error;
pub mod health;
pub mod images;
pub mod instances;
pub mod regions;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::store::Store;

/// Create the main API router with all endpoints
pub fn create_router(store: Store) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Region endpoints
        .route("/api/regions", get(regions::list_regions))
        .route("/api/{region}/zones", get(regions::list_zones))
        // Instance endpoints
        .route(
            "/api/{region}/instances",
            get(instances::list_instances).post(instances::run_instances),
        )
        .route(
            "/api/{region}/instances/{id}/start",
            post(instances::start_instance),
        )
        .route(
            "/api/{region}/instances/{id}/stop",
            post(instances::stop_instance),
        )
        .route(
            "/api/{region}/instances/{id}/reboot",
            post(instances::reboot_instance),
        )
        .route("/api/{region}/tags", post(instances::create_tags))
        // Image endpoints
        .route(
            "/api/{region}/images",
            get(images::list_images).post(images::create_image),
        )
        // Command endpoints
        .route("/api/{region}/commands", post(commands::send_command))
        .route(
            "/api/{region}/commands/{command_id}/invocations/{instance_id}",
            get(commands::get_invocation),
        )
        // Add state and middleware
        .with_state(store)
        .layer(TraceLayer::new_for_http())
}
