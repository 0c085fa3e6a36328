//! Instance command handlers
//!
//! Listing, lifecycle transitions and creation of instances.

use anyhow::{Result, bail};
use cloudctl_client::ControlPlaneClient;
use cloudctl_core::domain::instance::{Instance, InstanceState, InstanceStateChange};
use cloudctl_core::dto::instance::RunInstancesRequest;
use colored::*;

/// List instances of the region
pub async fn list_instances(client: &ControlPlaneClient) -> Result<()> {
    let instances = client.list_instances().await?;

    if instances.is_empty() {
        println!(
            "{}",
            format!("No instances found in region {}.", client.region()).yellow()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!("Instances in region {}:", client.region()).bold()
    );
    println!();
    for instance in &instances {
        print_instance_summary(instance);
    }

    Ok(())
}

/// Start an instance
pub async fn start_instance(client: &ControlPlaneClient, instance_id: &str) -> Result<()> {
    let change = client.start_instance(instance_id).await?;

    println!("Starting instance: {}", instance_id.cyan());
    print_state_change(&change);
    Ok(())
}

/// Stop an instance
pub async fn stop_instance(client: &ControlPlaneClient, instance_id: &str) -> Result<()> {
    let change = client.stop_instance(instance_id).await?;

    println!("Stopping instance: {}", instance_id.cyan());
    print_state_change(&change);
    Ok(())
}

/// Reboot an instance
pub async fn reboot_instance(client: &ControlPlaneClient, instance_id: &str) -> Result<()> {
    client.reboot_instance(instance_id).await?;

    println!("{} Rebooted instance {}", "✓".green(), instance_id.cyan());
    Ok(())
}

/// Launch one instance and tag it with `name`
pub async fn create_instance(
    client: &ControlPlaneClient,
    image_id: &str,
    name: &str,
    key_name: Option<String>,
) -> Result<()> {
    let launched = client
        .run_instances(&RunInstancesRequest::single(image_id, key_name))
        .await?;

    if launched.is_empty() {
        bail!("no instance was launched from {}", image_id);
    }

    let ids: Vec<String> = launched.iter().map(|i| i.instance_id.clone()).collect();
    println!("{} Created instance(s): {}", "✓".green(), ids.join(", ").cyan());

    if !name.trim().is_empty() {
        client.name_resources(ids, name).await?;
        println!("  Tagged with name: {}", name.bold());
    }

    for instance in &launched {
        println!(
            "  {} {}",
            instance.instance_id.dimmed(),
            colorize_state(instance.state)
        );
    }

    Ok(())
}

fn print_instance_summary(instance: &Instance) {
    println!("  {} Instance {}", "▸".cyan(), instance.instance_id.cyan());
    if let Some(name) = instance.name() {
        println!("    Name:       {}", name);
    }
    println!("    State:      {}", colorize_state(instance.state));
    println!("    Type:       {}", instance.instance_type);
    println!(
        "    Public DNS: {}",
        instance.public_dns_name.as_deref().unwrap_or("-").dimmed()
    );
    println!(
        "    Launched:   {}",
        instance
            .launch_time
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!();
}

fn print_state_change(change: &InstanceStateChange) {
    println!(
        "Current state: {} (was {})",
        colorize_state(change.current_state),
        change.previous_state
    );
}

fn colorize_state(state: InstanceState) -> ColoredString {
    let label = state.to_string();
    match state {
        InstanceState::Running => label.green(),
        InstanceState::Pending | InstanceState::Stopping | InstanceState::ShuttingDown => {
            label.yellow()
        }
        InstanceState::Stopped => label.dimmed(),
        InstanceState::Terminated => label.red(),
    }
}
