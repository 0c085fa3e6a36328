//! Data Transfer Objects for the control-plane API
//!
//! Request and response bodies exchanged between the client and the
//! control-plane (or its emulator).

pub mod command;
pub mod image;
pub mod instance;
