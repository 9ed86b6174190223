//! Utility functions and helpers.
//!
//! Common functionality used across multiple Eureka client crates.

pub mod auth;

// Re-export commonly used utilities
pub use auth::{basic_auth_header, encode_basic_credentials};
