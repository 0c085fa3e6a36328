//! Region and availability zone endpoints

use cloudctl_core::domain::region::{AvailabilityZone, Region};
use reqwest::Method;

use crate::ControlPlaneClient;
use crate::error::Result;

impl ControlPlaneClient {
    /// List the regions the control-plane serves
    ///
    /// Not scoped to the client's region.
    pub async fn list_regions(&self) -> Result<Vec<Region>> {
        let url = self.url(&["api", "regions"])?;
        let response = self.request(Method::GET, url).send().await?;

        self.handle_response(response).await
    }

    /// List the availability zones of the client's region
    pub async fn list_zones(&self) -> Result<Vec<AvailabilityZone>> {
        let url = self.regional_url(&["zones"])?;
        let response = self.request(Method::GET, url).send().await?;

        self.handle_response(response).await
    }
}
