//! Core data types for Eureka registration.
//!
//! This module provides the fundamental types used throughout the client:
//! - Instance descriptors in the registry's wire shape
//! - Registration configuration and credentials

pub mod instance;
pub mod registration;

// Re-export all public types
pub use instance::{DataCenterInfo, InstanceDescriptor, InstanceStatus, PortData};
pub use registration::{Credentials, RegistrationConfig};
