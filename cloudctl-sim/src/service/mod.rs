//! Service Module
//!
//! Business logic of the emulator. Services lock the store, validate
//! requests against the current inventory and apply state transitions.

pub mod command;
pub mod image;
pub mod instance;
pub mod region;

// Re-export for convenience
pub use command as command_service;
pub use image as image_service;
pub use instance as instance_service;
pub use region as region_service;

use crate::store::{Inventory, RegionInventory};

/// Service error type
#[derive(Debug)]
pub enum ServiceError {
    RegionNotFound(String),
    NotFound(String),
    InvalidState(String),
    ValidationError(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub(crate) fn region<'a>(
    inventory: &'a Inventory,
    name: &str,
) -> ServiceResult<&'a RegionInventory> {
    inventory
        .regions
        .get(name)
        .ok_or_else(|| ServiceError::RegionNotFound(name.to_string()))
}

pub(crate) fn region_mut<'a>(
    inventory: &'a mut Inventory,
    name: &str,
) -> ServiceResult<&'a mut RegionInventory> {
    inventory
        .regions
        .get_mut(name)
        .ok_or_else(|| ServiceError::RegionNotFound(name.to_string()))
}
