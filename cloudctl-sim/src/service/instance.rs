//! Instance Service
//!
//! Business logic for the instance lifecycle.
//!
//! Launched instances are `Pending` until the next listing, which finishes
//! their boot and reports them `Running`.

use chrono::Utc;
use cloudctl_core::domain::instance::{Instance, InstanceState, InstanceStateChange};
use cloudctl_core::dto::instance::{CreateTagsRequest, RunInstancesRequest};
use uuid::Uuid;

use crate::service::{ServiceError, ServiceResult, region_mut};
use crate::store::Store;

/// Most instances a single launch request may create
pub const MAX_INSTANCES_PER_LAUNCH: u32 = 20;

/// List instances of a region, completing the boot of pending ones
pub async fn list_instances(store: &Store, region_name: &str) -> ServiceResult<Vec<Instance>> {
    let mut inventory = store.write().await;
    let region = region_mut(&mut inventory, region_name)?;

    for instance in region.instances.values_mut() {
        if instance.state == InstanceState::Pending {
            instance.state = InstanceState::Running;
        }
    }

    Ok(region.instances.values().cloned().collect())
}

/// Start an instance
///
/// Starting a running instance is a no-op transition.
pub async fn start_instance(
    store: &Store,
    region_name: &str,
    instance_id: &str,
) -> ServiceResult<InstanceStateChange> {
    transition(store, region_name, instance_id, InstanceState::Running).await
}

/// Stop an instance
///
/// Stopping a stopped instance is a no-op transition.
pub async fn stop_instance(
    store: &Store,
    region_name: &str,
    instance_id: &str,
) -> ServiceResult<InstanceStateChange> {
    transition(store, region_name, instance_id, InstanceState::Stopped).await
}

/// Reboot a running instance
pub async fn reboot_instance(
    store: &Store,
    region_name: &str,
    instance_id: &str,
) -> ServiceResult<()> {
    let mut inventory = store.write().await;
    let region = region_mut(&mut inventory, region_name)?;
    let instance = region
        .instances
        .get(instance_id)
        .ok_or_else(|| ServiceError::NotFound(format!("Instance {} not found", instance_id)))?;

    if instance.state != InstanceState::Running {
        return Err(ServiceError::InvalidState(format!(
            "Instance {} cannot be rebooted while {}",
            instance_id, instance.state
        )));
    }

    tracing::info!("Instance {} rebooted", instance_id);
    Ok(())
}

/// Launch instances from an image of the region
pub async fn run_instances(
    store: &Store,
    region_name: &str,
    req: RunInstancesRequest,
) -> ServiceResult<Vec<Instance>> {
    if req.min_count == 0 || req.min_count > req.max_count {
        return Err(ServiceError::ValidationError(format!(
            "Invalid instance count: min {} max {}",
            req.min_count, req.max_count
        )));
    }
    if req.max_count > MAX_INSTANCES_PER_LAUNCH {
        return Err(ServiceError::ValidationError(format!(
            "At most {} instances can be launched per request, got {}",
            MAX_INSTANCES_PER_LAUNCH, req.max_count
        )));
    }
    if req.instance_type.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "Instance type cannot be empty".to_string(),
        ));
    }

    let mut inventory = store.write().await;
    let region = region_mut(&mut inventory, region_name)?;

    if !region.images.contains_key(&req.image_id) {
        return Err(ServiceError::NotFound(format!(
            "Image {} not found",
            req.image_id
        )));
    }

    let now = Utc::now();
    let mut launched = Vec::new();
    for _ in 0..req.max_count {
        let instance = Instance {
            instance_id: new_instance_id(),
            state: InstanceState::Pending,
            instance_type: req.instance_type.clone(),
            image_id: req.image_id.clone(),
            public_dns_name: None,
            key_name: req.key_name.clone(),
            launch_time: now,
            tags: Default::default(),
        };
        region
            .instances
            .insert(instance.instance_id.clone(), instance.clone());
        launched.push(instance);
    }

    tracing::info!(
        "Launched {} instance(s) from {} in {}",
        launched.len(),
        req.image_id,
        region_name
    );

    Ok(launched)
}

/// Merge tags into existing instances
///
/// Fails without tagging anything if one resource is unknown.
pub async fn create_tags(
    store: &Store,
    region_name: &str,
    req: CreateTagsRequest,
) -> ServiceResult<()> {
    let mut inventory = store.write().await;
    let region = region_mut(&mut inventory, region_name)?;

    if let Some(missing) = req
        .resources
        .iter()
        .find(|id| !region.instances.contains_key(*id))
    {
        return Err(ServiceError::NotFound(format!("Resource {} not found", missing)));
    }

    for id in &req.resources {
        if let Some(instance) = region.instances.get_mut(id) {
            instance.tags.extend(req.tags.clone());
        }
    }

    Ok(())
}

async fn transition(
    store: &Store,
    region_name: &str,
    instance_id: &str,
    target: InstanceState,
) -> ServiceResult<InstanceStateChange> {
    let mut inventory = store.write().await;
    let region = region_mut(&mut inventory, region_name)?;
    let instance = region
        .instances
        .get_mut(instance_id)
        .ok_or_else(|| ServiceError::NotFound(format!("Instance {} not found", instance_id)))?;

    let previous_state = instance.state;
    if matches!(
        previous_state,
        InstanceState::Terminated | InstanceState::ShuttingDown
    ) {
        return Err(ServiceError::InvalidState(format!(
            "Instance {} is {}",
            instance_id, previous_state
        )));
    }

    instance.state = target;
    tracing::info!(
        "Instance {} moved from {} to {}",
        instance_id,
        previous_state,
        target
    );

    Ok(InstanceStateChange {
        instance_id: instance_id.to_string(),
        previous_state,
        current_state: target,
    })
}

fn new_instance_id() -> String {
    format!("i-{}", &Uuid::new_v4().simple().to_string()[..17])
}
