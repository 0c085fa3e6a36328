//! In-memory store
//!
//! Holds every region's resources behind one async lock shared by all
//! handlers. Seed data gives a fresh emulator something to list.

use chrono::{TimeZone, Utc};
use cloudctl_core::domain::command::CommandInvocation;
use cloudctl_core::domain::image::{Image, ImageState};
use cloudctl_core::domain::instance::{Instance, InstanceState, NAME_TAG};
use cloudctl_core::domain::region::{AvailabilityZone, Region};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Account id the emulator acts as; images it creates belong to it
pub const ACCOUNT_ID: &str = "123456789012";

/// Owner id of the seeded public base image
pub const PUBLIC_OWNER_ID: &str = "137112412989";

/// Shared handle to the emulator state
pub type Store = Arc<RwLock<Inventory>>;

/// All resources, keyed by region name
#[derive(Debug, Default)]
pub struct Inventory {
    pub regions: BTreeMap<String, RegionInventory>,
}

/// Resources of one region
#[derive(Debug)]
pub struct RegionInventory {
    pub region: Region,
    pub zones: Vec<AvailabilityZone>,
    pub instances: BTreeMap<String, Instance>,
    pub images: BTreeMap<String, Image>,
    /// Keyed by (command id, instance id)
    pub invocations: HashMap<(String, String), InvocationRecord>,
}

/// A command invocation plus what the emulator needs to progress it
#[derive(Debug, Clone)]
pub struct InvocationRecord {
    pub invocation: CommandInvocation,
    /// Shell commands the invocation runs
    pub commands: Vec<String>,
    /// Set when the target could not run commands at submission time
    pub failure: Option<String>,
    /// Status queries answered so far
    pub queries: u32,
}

impl RegionInventory {
    /// An empty region with the given zone suffixes (e.g. `["a", "b"]`)
    pub fn new(name: &str, zone_suffixes: &[&str]) -> Self {
        let zones = zone_suffixes
            .iter()
            .enumerate()
            .map(|(idx, suffix)| AvailabilityZone {
                zone_name: format!("{}{}", name, suffix),
                zone_id: format!("{}-az{}", short_region_code(name), idx + 1),
                state: "available".to_string(),
                messages: Vec::new(),
            })
            .collect();

        Self {
            region: Region {
                region_name: name.to_string(),
                endpoint: format!("ec2.{}.amazonaws.com", name),
            },
            zones,
            instances: BTreeMap::new(),
            images: BTreeMap::new(),
            invocations: HashMap::new(),
        }
    }
}

impl Inventory {
    /// Inventory with two regions, a public base image and two instances
    pub fn seeded() -> Self {
        let launched = Utc
            .with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
            .single()
            .unwrap_or_else(Utc::now);

        let mut seoul = RegionInventory::new("ap-northeast-2", &["a", "b", "c", "d"]);
        seoul.images.insert(
            "ami-0c9c942bd7bf113a2".to_string(),
            Image {
                image_id: "ami-0c9c942bd7bf113a2".to_string(),
                name: "ubuntu-22.04-amd64-server".to_string(),
                state: ImageState::Available,
                description: Some("Canonical, Ubuntu, 22.04 LTS".to_string()),
                owner_id: PUBLIC_OWNER_ID.to_string(),
                source_instance_id: None,
                creation_date: launched,
            },
        );
        for (id, name, state, dns) in [
            (
                "i-0a1b2c3d4e5f60001",
                "web-1",
                InstanceState::Running,
                Some("ec2-3-38-1-10.ap-northeast-2.compute.amazonaws.com"),
            ),
            ("i-0a1b2c3d4e5f60002", "batch-1", InstanceState::Stopped, None),
        ] {
            seoul.instances.insert(
                id.to_string(),
                Instance {
                    instance_id: id.to_string(),
                    state,
                    instance_type: "t2.micro".to_string(),
                    image_id: "ami-0c9c942bd7bf113a2".to_string(),
                    public_dns_name: dns.map(str::to_string),
                    key_name: Some("ops-key".to_string()),
                    launch_time: launched,
                    tags: HashMap::from([(NAME_TAG.to_string(), name.to_string())]),
                },
            );
        }

        let virginia = RegionInventory::new("us-east-1", &["a", "b"]);

        let mut inventory = Self::default();
        inventory
            .regions
            .insert(seoul.region.region_name.clone(), seoul);
        inventory
            .regions
            .insert(virginia.region.region_name.clone(), virginia);
        inventory
    }
}

/// Create a shared store from an inventory
pub fn create_store(inventory: Inventory) -> Store {
    Arc::new(RwLock::new(inventory))
}

/// `ap-northeast-2` -> `apne2`
fn short_region_code(name: &str) -> String {
    name.split('-')
        .map(|part| match part {
            "northeast" => "ne".to_string(),
            "southeast" => "se".to_string(),
            "east" => "e".to_string(),
            "west" => "w".to_string(),
            other => other.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_inventory() {
        let inventory = Inventory::seeded();
        assert_eq!(inventory.regions.len(), 2);

        let seoul = &inventory.regions["ap-northeast-2"];
        assert_eq!(seoul.zones.len(), 4);
        assert_eq!(seoul.zones[0].zone_name, "ap-northeast-2a");
        assert_eq!(seoul.zones[0].zone_id, "apne2-az1");
        assert_eq!(seoul.instances.len(), 2);
        assert_eq!(seoul.images.len(), 1);
    }

    #[test]
    fn test_short_region_code() {
        assert_eq!(short_region_code("ap-northeast-2"), "apne2");
        assert_eq!(short_region_code("us-east-1"), "use1");
    }
}
