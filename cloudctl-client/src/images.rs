//! Image-related API endpoints

use cloudctl_core::domain::image::Image;
use cloudctl_core::dto::image::{CreateImageRequest, CreateImageResponse, ImageQuery};
use reqwest::Method;

use crate::error::Result;
use crate::{ControlPlaneClient, require_id};

impl ControlPlaneClient {
    /// List images, optionally filtered by owner
    ///
    /// # Arguments
    /// * `owner` - Owner filter (e.g. `"self"` for images created by this account)
    pub async fn list_images(&self, owner: Option<&str>) -> Result<Vec<Image>> {
        let url = self.regional_url(&["images"])?;
        let query = ImageQuery {
            owner: owner.map(str::to_string),
        };
        let response = self
            .request(Method::GET, url)
            .query(&query)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Capture an image from an instance
    ///
    /// The image may take minutes to become available; the returned id is
    /// valid immediately.
    pub async fn create_image(&self, req: &CreateImageRequest) -> Result<CreateImageResponse> {
        require_id("instance id", &req.instance_id)?;
        require_id("image name", &req.name)?;
        let url = self.regional_url(&["images"])?;
        let response = self.request(Method::POST, url).json(req).send().await?;

        self.handle_response(response).await
    }
}
