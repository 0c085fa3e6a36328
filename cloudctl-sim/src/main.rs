use cloudctl_sim::store::{Inventory, create_store};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloudctl_sim=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting cloudctl control-plane emulator...");

    let inventory = Inventory::seeded();
    tracing::info!("Seeded {} regions", inventory.regions.len());

    // Get bind address
    let addr =
        std::env::var("CLOUDCTL_SIM_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    cloudctl_sim::serve(listener, create_store(inventory)).await
}
