//! Image command handlers

use anyhow::Result;
use cloudctl_client::ControlPlaneClient;
use cloudctl_core::domain::image::{Image, ImageState};
use cloudctl_core::dto::image::{CreateImageRequest, OWNER_SELF};
use colored::*;

/// List images owned by this account
pub async fn list_images(client: &ControlPlaneClient) -> Result<()> {
    let images = client.list_images(Some(OWNER_SELF)).await?;

    if images.is_empty() {
        println!("{}", "No images found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} image(s):", images.len()).bold());
    println!();
    for image in &images {
        print_image(image);
    }

    Ok(())
}

/// Capture an image from an instance
///
/// The instance is rebooted so the file system is consistent.
pub async fn create_image(
    client: &ControlPlaneClient,
    instance_id: &str,
    name: &str,
    description: Option<String>,
) -> Result<()> {
    let response = client
        .create_image(&CreateImageRequest {
            instance_id: instance_id.to_string(),
            name: name.to_string(),
            description: description.filter(|d| !d.trim().is_empty()),
            no_reboot: false,
        })
        .await?;

    println!("{} Image creation requested", "✓".green());
    println!("  Image ID: {}", response.image_id.cyan());
    println!(
        "  {}",
        "The image may take a few minutes to become available.".dimmed()
    );
    Ok(())
}

fn print_image(image: &Image) {
    let state = match image.state {
        ImageState::Available => image.state.to_string().green(),
        ImageState::Pending => image.state.to_string().yellow(),
        ImageState::Failed => image.state.to_string().red(),
    };

    println!("  {} Image {}", "▸".cyan(), image.image_id.cyan());
    println!("    Name:        {}", image.name);
    println!("    State:       {}", state);
    println!(
        "    Description: {}",
        image.description.as_deref().unwrap_or("-").dimmed()
    );
    println!();
}
