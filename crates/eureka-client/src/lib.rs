//! Eureka registry client
//!
//! This crate registers a service instance with a Eureka registry over its REST
//! API and removes it again on shutdown. Each call performs exactly one HTTP
//! exchange; success is decided by the response status code alone.

pub mod client;
pub mod api;

// Re-export main types
pub use client::{RegistryClient, TransportConfig};
pub use api::{encode_registration, RegistrationEnvelope};

use eureka_core::error::EurekaError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, EurekaError>;
