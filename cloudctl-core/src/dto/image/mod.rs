//! Image DTOs

use serde::{Deserialize, Serialize};

/// Owner filter selecting images created by the caller's account
pub const OWNER_SELF: &str = "self";

/// Request to capture an image from an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateImageRequest {
    pub instance_id: String,
    pub name: String,
    pub description: Option<String>,
    /// When false the instance is rebooted so the image is consistent
    pub no_reboot: bool,
}

/// Response of an image capture request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateImageResponse {
    pub image_id: String,
}

/// Query parameters for listing images
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageQuery {
    pub owner: Option<String>,
}
