//! # eureka-core
//!
//! Core types and utilities shared across all Eureka client crates.
//!
//! This crate provides:
//! - InstanceDescriptor and its wire-compatible parts (port, status, data center)
//! - RegistrationConfig and Credentials passed into every registry call
//! - EurekaError enum for unified error handling
//! - Authorization header helpers
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Registry-facing data types
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{EurekaError, EurekaResult};
pub use types::{
    Credentials, DataCenterInfo, InstanceDescriptor, InstanceStatus, PortData, RegistrationConfig,
};
