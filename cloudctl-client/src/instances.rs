//! Instance-related API endpoints

use cloudctl_core::domain::instance::{Instance, InstanceStateChange, NAME_TAG};
use cloudctl_core::dto::instance::{CreateTagsRequest, RunInstancesRequest};
use reqwest::Method;
use std::collections::HashMap;

use crate::error::Result;
use crate::{ControlPlaneClient, require_id};

impl ControlPlaneClient {
    // =============================================================================
    // Instance Query
    // =============================================================================

    /// List all instances in the region
    pub async fn list_instances(&self) -> Result<Vec<Instance>> {
        let url = self.regional_url(&["instances"])?;
        let response = self.request(Method::GET, url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Instance Lifecycle
    // =============================================================================

    /// Start a stopped instance
    ///
    /// # Returns
    /// The state transition the instance went through
    pub async fn start_instance(&self, instance_id: &str) -> Result<InstanceStateChange> {
        require_id("instance id", instance_id)?;
        let url = self.regional_url(&["instances", instance_id, "start"])?;
        let response = self.request(Method::POST, url).send().await?;

        self.handle_response(response).await
    }

    /// Stop a running instance
    ///
    /// # Returns
    /// The state transition the instance went through
    pub async fn stop_instance(&self, instance_id: &str) -> Result<InstanceStateChange> {
        require_id("instance id", instance_id)?;
        let url = self.regional_url(&["instances", instance_id, "stop"])?;
        let response = self.request(Method::POST, url).send().await?;

        self.handle_response(response).await
    }

    /// Reboot an instance
    pub async fn reboot_instance(&self, instance_id: &str) -> Result<()> {
        require_id("instance id", instance_id)?;
        let url = self.regional_url(&["instances", instance_id, "reboot"])?;
        let response = self.request(Method::POST, url).send().await?;

        self.handle_empty_response(response).await
    }

    /// Launch instances from an image
    ///
    /// # Returns
    /// The launched instances, usually still pending
    pub async fn run_instances(&self, req: &RunInstancesRequest) -> Result<Vec<Instance>> {
        require_id("image id", &req.image_id)?;
        let url = self.regional_url(&["instances"])?;
        let response = self.request(Method::POST, url).json(req).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Tags
    // =============================================================================

    /// Attach tags to resources
    pub async fn create_tags(&self, req: &CreateTagsRequest) -> Result<()> {
        if req.resources.is_empty() {
            return Ok(());
        }

        let url = self.regional_url(&["tags"])?;
        let response = self.request(Method::POST, url).json(req).send().await?;

        self.handle_empty_response(response).await
    }

    /// Set the `Name` tag on resources
    pub async fn name_resources(&self, resources: Vec<String>, name: &str) -> Result<()> {
        self.create_tags(&CreateTagsRequest {
            resources,
            tags: HashMap::from([(NAME_TAG.to_string(), name.to_string())]),
        })
        .await
    }
}
