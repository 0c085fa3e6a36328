//! cloudctl Core
//!
//! Core types shared by every cloudctl component.
//!
//! This crate contains:
//! - Domain types: control-plane resources (instances, zones, regions, images, command invocations)
//! - DTOs: request and response bodies of the control-plane API

pub mod domain;
pub mod dto;
