//! Core domain types
//!
//! This module contains the resources exposed by the control-plane.
//! They are shared between the emulator (which owns them) and the client
//! and console (which read them).

pub mod command;
pub mod image;
pub mod instance;
pub mod region;
