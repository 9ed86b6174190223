//! Instance descriptor types.
//!
//! Field names and nesting follow the registry's JSON representation exactly,
//! including the `$` / `@enabled` port keys and the `@class` data center key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Data center class used for self-managed hosts
pub const DEFAULT_DATA_CENTER_CLASS: &str = "com.netflix.appinfo.InstanceInfo$DefaultDataCenterInfo";

/// Data center class used for instances running on AWS
pub const AMAZON_DATA_CENTER_CLASS: &str = "com.netflix.appinfo.AmazonInfo";

/// Lifecycle status reported to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    #[default]
    Up,
    Down,
    OutOfService,
}

impl InstanceStatus {
    /// Wire literal for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Up => "UP",
            InstanceStatus::Down => "DOWN",
            InstanceStatus::OutOfService => "OUT_OF_SERVICE",
        }
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UP" => Ok(InstanceStatus::Up),
            "DOWN" => Ok(InstanceStatus::Down),
            "OUT_OF_SERVICE" => Ok(InstanceStatus::OutOfService),
            other => Err(format!(
                "unknown instance status '{}', expected UP, DOWN or OUT_OF_SERVICE",
                other
            )),
        }
    }
}

/// Port number plus enabled flag
///
/// The registry expects the flag as the string `"true"` or `"false"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortData {
    #[serde(rename = "$")]
    pub value: u16,
    #[serde(rename = "@enabled", with = "enabled_flag")]
    pub enabled: bool,
}

impl PortData {
    pub fn enabled(value: u16) -> Self {
        Self { value, enabled: true }
    }

    pub fn disabled(value: u16) -> Self {
        Self { value, enabled: false }
    }
}

/// Hosting environment of the instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCenterInfo {
    #[serde(rename = "@class")]
    pub class: String,
    pub name: String,
}

impl DataCenterInfo {
    /// Self-managed data center ("MyOwn")
    pub fn own() -> Self {
        Self {
            class: DEFAULT_DATA_CENTER_CLASS.to_string(),
            name: "MyOwn".to_string(),
        }
    }

    /// AWS-hosted instance
    pub fn amazon() -> Self {
        Self {
            class: AMAZON_DATA_CENTER_CLASS.to_string(),
            name: "Amazon".to_string(),
        }
    }
}

impl Default for DataCenterInfo {
    fn default() -> Self {
        Self::own()
    }
}

/// Registry-facing representation of a service instance
///
/// Built once before registration and never mutated afterwards; the
/// `instance_id` is the handle used to deregister, so it must stay stable
/// for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDescriptor {
    pub instance_id: String,
    pub host_name: String,
    pub app: String,
    pub ip_addr: String,
    pub status: InstanceStatus,
    pub port: PortData,
    pub secure_port: PortData,
    pub home_page_url: String,
    pub status_page_url: String,
    pub health_check_url: String,
    pub vip_address: String,
    pub secure_vip_address: String,
    pub country_id: i32,
    pub data_center_info: DataCenterInfo,
}

impl InstanceDescriptor {
    /// Create a descriptor for a plain HTTP service with conventional defaults
    ///
    /// The instance id is `{host}:{app}:{port}`, page URLs point at
    /// `http://{host}:{port}/`, `/status` and `/health`, both VIP addresses
    /// equal the app name and the secure port 443 is disabled.
    pub fn new(app: &str, host_name: &str, ip_addr: &str, port: u16) -> Self {
        let base_url = format!("http://{}:{}", host_name, port);
        Self {
            instance_id: format!("{}:{}:{}", host_name, app, port),
            host_name: host_name.to_string(),
            app: app.to_string(),
            ip_addr: ip_addr.to_string(),
            status: InstanceStatus::Up,
            port: PortData::enabled(port),
            secure_port: PortData::disabled(443),
            home_page_url: format!("{}/", base_url),
            status_page_url: format!("{}/status", base_url),
            health_check_url: format!("{}/health", base_url),
            vip_address: app.to_string(),
            secure_vip_address: app.to_string(),
            country_id: 1,
            data_center_info: DataCenterInfo::own(),
        }
    }

    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = instance_id.into();
        self
    }

    pub fn with_status(mut self, status: InstanceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_port(mut self, port: PortData) -> Self {
        self.port = port;
        self
    }

    pub fn with_secure_port(mut self, secure_port: PortData) -> Self {
        self.secure_port = secure_port;
        self
    }

    pub fn with_home_page_url(mut self, url: impl Into<String>) -> Self {
        self.home_page_url = url.into();
        self
    }

    pub fn with_status_page_url(mut self, url: impl Into<String>) -> Self {
        self.status_page_url = url.into();
        self
    }

    pub fn with_health_check_url(mut self, url: impl Into<String>) -> Self {
        self.health_check_url = url.into();
        self
    }

    pub fn with_vip_address(mut self, vip_address: impl Into<String>) -> Self {
        self.vip_address = vip_address.into();
        self
    }

    pub fn with_secure_vip_address(mut self, secure_vip_address: impl Into<String>) -> Self {
        self.secure_vip_address = secure_vip_address.into();
        self
    }

    pub fn with_country_id(mut self, country_id: i32) -> Self {
        self.country_id = country_id;
        self
    }

    pub fn with_data_center(mut self, data_center_info: DataCenterInfo) -> Self {
        self.data_center_info = data_center_info;
        self
    }
}

/// Serialize a bool as the `"true"`/`"false"` strings the registry uses,
/// accepting either form on the way back in.
mod enabled_flag {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S>(enabled: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(if *enabled { "true" } else { "false" })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FlagVisitor;

        impl<'de> Visitor<'de> for FlagVisitor {
            type Value = bool;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"true\", \"false\" or a boolean")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
                Ok(v)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
                match v {
                    "true" => Ok(true),
                    "false" => Ok(false),
                    other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(FlagVisitor)
    }
}
