//! Machine image domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A machine image that instances can be launched from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub image_id: String,
    pub name: String,
    pub state: ImageState,
    pub description: Option<String>,
    /// Account that owns the image
    pub owner_id: String,
    /// Instance the image was captured from (for images created by the account)
    pub source_instance_id: Option<String>,
    pub creation_date: DateTime<Utc>,
}

/// Availability of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageState {
    Pending,
    Available,
    Failed,
}

impl std::fmt::Display for ImageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageState::Pending => write!(f, "pending"),
            ImageState::Available => write!(f, "available"),
            ImageState::Failed => write!(f, "failed"),
        }
    }
}
