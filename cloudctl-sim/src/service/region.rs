//! Region Service

use cloudctl_core::domain::region::{AvailabilityZone, Region};

use crate::service::{ServiceResult, region};
use crate::store::Store;

/// List every region the emulator serves
pub async fn list_regions(store: &Store) -> Vec<Region> {
    let inventory = store.read().await;
    inventory
        .regions
        .values()
        .map(|r| r.region.clone())
        .collect()
}

/// List the availability zones of a region
pub async fn list_zones(store: &Store, region_name: &str) -> ServiceResult<Vec<AvailabilityZone>> {
    let inventory = store.read().await;
    Ok(region(&inventory, region_name)?.zones.clone())
}
