//! Image Service

use chrono::Utc;
use cloudctl_core::domain::image::{Image, ImageState};
use cloudctl_core::dto::image::{CreateImageRequest, CreateImageResponse, OWNER_SELF};
use uuid::Uuid;

use crate::service::{ServiceError, ServiceResult, region, region_mut};
use crate::store::{ACCOUNT_ID, Store};

/// List images of a region
///
/// `owner` filters by owner account id; `"self"` means the emulator's own account.
pub async fn list_images(
    store: &Store,
    region_name: &str,
    owner: Option<&str>,
) -> ServiceResult<Vec<Image>> {
    let inventory = store.read().await;
    let region = region(&inventory, region_name)?;

    let owner = owner.map(|o| if o == OWNER_SELF { ACCOUNT_ID } else { o });

    Ok(region
        .images
        .values()
        .filter(|image| owner.is_none_or(|o| image.owner_id == o))
        .cloned()
        .collect())
}

/// Capture an image from an instance of the region
pub async fn create_image(
    store: &Store,
    region_name: &str,
    req: CreateImageRequest,
) -> ServiceResult<CreateImageResponse> {
    if req.name.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "Image name cannot be empty".to_string(),
        ));
    }

    let mut inventory = store.write().await;
    let region = region_mut(&mut inventory, region_name)?;

    if !region.instances.contains_key(&req.instance_id) {
        return Err(ServiceError::NotFound(format!(
            "Instance {} not found",
            req.instance_id
        )));
    }

    if region
        .images
        .values()
        .any(|image| image.owner_id == ACCOUNT_ID && image.name == req.name)
    {
        return Err(ServiceError::InvalidState(format!(
            "Image name {} is already in use",
            req.name
        )));
    }

    let image_id = format!("ami-{}", &Uuid::new_v4().simple().to_string()[..17]);
    region.images.insert(
        image_id.clone(),
        Image {
            image_id: image_id.clone(),
            name: req.name,
            state: ImageState::Available,
            description: req.description.filter(|d| !d.trim().is_empty()),
            owner_id: ACCOUNT_ID.to_string(),
            source_instance_id: Some(req.instance_id.clone()),
            creation_date: Utc::now(),
        },
    );

    tracing::info!(
        "Image {} captured from {} (reboot: {})",
        image_id,
        req.instance_id,
        !req.no_reboot
    );

    Ok(CreateImageResponse { image_id })
}
