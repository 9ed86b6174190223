//! Configuration parsing for the Eureka registration client
//!
//! This crate handles parsing and validation of eureka.toml files and layers
//! them with the global config, environment variables and command line flags
//! into a ready-to-use registration target.

pub mod toml;
pub mod merge;

// Re-export main types
pub use self::toml::{
    DataCenterSection, EurekaToml, InstanceSection, RegistrySection, ResolvedConfig, TransportSection,
};
pub use self::merge::{ConfigLayering, ConfigLoader, ConfigSource};

use eureka_core::error::EurekaError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, EurekaError>;
