//! Region and availability zone handlers

use anyhow::Result;
use cloudctl_client::ControlPlaneClient;
use colored::*;

/// List availability zones of the client's region
pub async fn list_zones(client: &ControlPlaneClient) -> Result<()> {
    let zones = client.list_zones().await?;

    println!(
        "{}",
        format!("Availability zones in region {}:", client.region()).bold()
    );
    println!();
    for zone in &zones {
        println!("  {} {}", "▸".cyan(), zone.zone_name.cyan());
        println!("    State:    {}", zone.state);
        println!("    Zone ID:  {}", zone.zone_id.dimmed());
        if !zone.messages.is_empty() {
            println!("    Messages: {}", zone.messages.join(", "));
        }
        println!();
    }

    Ok(())
}

/// List regions served by the control-plane
pub async fn list_regions(client: &ControlPlaneClient) -> Result<()> {
    let regions = client.list_regions().await?;

    println!("{}", "Available regions:".bold());
    println!();
    for region in &regions {
        println!("  {} {}", "▸".cyan(), region.region_name.cyan());
        println!("    Endpoint: {}", region.endpoint.dimmed());
        println!();
    }

    Ok(())
}
