//! In-memory control-plane emulator
//!
//! Serves the instance, image and command API from seeded in-memory state,
//! for local development and integration tests.
//!
//! ```no_run
//! use cloudctl_sim::store::{Inventory, create_store};
//!
//! # async fn run() -> std::io::Result<()> {
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
//! cloudctl_sim::serve(listener, create_store(Inventory::seeded())).await
//! # }
//! ```

pub mod api;
pub mod service;
pub mod store;

use tokio::net::TcpListener;

use crate::store::Store;

/// Serve the API on `listener` until the process ends
pub async fn serve(listener: TcpListener, store: Store) -> std::io::Result<()> {
    axum::serve(listener, api::create_router(store)).await
}
