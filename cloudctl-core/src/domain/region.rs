//! Region and availability zone types

use serde::{Deserialize, Serialize};

/// A provider region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub region_name: String,
    pub endpoint: String,
}

/// An availability zone within a region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityZone {
    pub zone_name: String,
    pub zone_id: String,
    pub state: String,
    #[serde(default)]
    pub messages: Vec<String>,
}
