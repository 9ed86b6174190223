//! eureka.toml configuration parsing and serialization

use std::time::Duration;
use serde::{Deserialize, Serialize};
use eureka_core::error::EurekaError;
use eureka_core::types::{
    Credentials, DataCenterInfo, InstanceDescriptor, InstanceStatus, PortData, RegistrationConfig,
};
use crate::ConfigResult;

/// Default host name when `[instance]` does not set one
pub const DEFAULT_HOST_NAME: &str = "localhost";
/// Default IP address when `[instance]` does not set one
pub const DEFAULT_IP_ADDR: &str = "127.0.0.1";
/// Default service port when `[instance]` does not set one
pub const DEFAULT_PORT: u16 = 8080;

/// Complete eureka.toml configuration
///
/// Every key is optional at parse time so that partial files (the global
/// config, for instance) can be layered; [`validate_config`] checks the
/// merged result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EurekaToml {
    /// Registry target and credentials
    #[serde(default)]
    pub registry: RegistrySection,

    /// Instance descriptor overrides
    #[serde(default)]
    pub instance: InstanceSection,

    /// HTTP transport tuning
    #[serde(default)]
    pub transport: TransportSection,
}

/// `[registry]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RegistrySection {
    /// Registry URL including the application path segment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Application name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,

    /// Basic auth username
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Basic auth password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Verbatim Authorization header for registration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_header: Option<String>,
}

/// `[instance]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct InstanceSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_addr: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InstanceStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_port_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_page_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_page_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vip_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_vip_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_id: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_center: Option<DataCenterSection>,
}

/// `[instance.data-center]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataCenterSection {
    pub class: String,
    pub name: String,
}

/// `[transport]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TransportSection {
    /// Whole-request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Connect timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,

    /// Idle pooled connections per host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_max_idle_per_host: Option<usize>,

    /// User agent override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl TransportSection {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}

/// Fully validated configuration, ready for the registry client
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub registration: RegistrationConfig,
    pub credentials: Credentials,
    pub transport: TransportSection,
}

impl EurekaToml {
    /// Validate and turn the layered file into a registration target
    pub fn resolve(&self) -> ConfigResult<ResolvedConfig> {
        validate_config(self)?;

        // validate_config guarantees both are present
        let url = self.registry.url.clone().unwrap_or_default();
        let app = self.registry.app.clone().unwrap_or_default();

        let registration = RegistrationConfig {
            eureka_url: url,
            instance: self.instance.to_descriptor(&app),
            app,
            auth_header: self.registry.auth_header.clone(),
        };

        let credentials = Credentials::new(
            self.registry.username.clone().unwrap_or_default(),
            self.registry.password.clone().unwrap_or_default(),
        );

        Ok(ResolvedConfig {
            registration,
            credentials,
            transport: self.transport.clone(),
        })
    }
}

impl InstanceSection {
    /// Build the descriptor, starting from conventional defaults
    pub fn to_descriptor(&self, app: &str) -> InstanceDescriptor {
        let host_name = self.host_name.as_deref().unwrap_or(DEFAULT_HOST_NAME);
        let ip_addr = self.ip_addr.as_deref().unwrap_or(DEFAULT_IP_ADDR);
        let port = self.port.unwrap_or(DEFAULT_PORT);

        let mut instance = InstanceDescriptor::new(app, host_name, ip_addr, port);

        if let Some(instance_id) = &self.instance_id {
            instance.instance_id = instance_id.clone();
        }
        if let Some(status) = self.status {
            instance.status = status;
        }
        if let Some(enabled) = self.port_enabled {
            instance.port.enabled = enabled;
        }
        if self.secure_port.is_some() || self.secure_port_enabled.is_some() {
            instance.secure_port = PortData {
                value: self.secure_port.unwrap_or(instance.secure_port.value),
                enabled: self.secure_port_enabled.unwrap_or(instance.secure_port.enabled),
            };
        }
        if let Some(url) = &self.home_page_url {
            instance.home_page_url = url.clone();
        }
        if let Some(url) = &self.status_page_url {
            instance.status_page_url = url.clone();
        }
        if let Some(url) = &self.health_check_url {
            instance.health_check_url = url.clone();
        }
        if let Some(vip) = &self.vip_address {
            instance.vip_address = vip.clone();
        }
        if let Some(vip) = &self.secure_vip_address {
            instance.secure_vip_address = vip.clone();
        }
        if let Some(country_id) = self.country_id {
            instance.country_id = country_id;
        }
        if let Some(data_center) = &self.data_center {
            instance.data_center_info = DataCenterInfo {
                class: data_center.class.clone(),
                name: data_center.name.clone(),
            };
        }

        instance
    }
}

/// Parse TOML string to EurekaToml configuration
///
/// Only syntax and value types are checked here; call [`validate_config`]
/// (or [`EurekaToml::resolve`]) once all layers are merged.
pub fn parse_eureka_toml(content: &str) -> ConfigResult<EurekaToml> {
    // First try with toml_edit for better error reporting
    content.parse::<toml_edit::DocumentMut>()
        .map_err(|e| located_error(content, e.message(), e.span()))?;

    // Then parse with serde for type safety
    ::toml::from_str(content)
        .map_err(|e| located_error(content, e.message(), e.span()))
}

/// Serialize EurekaToml to TOML string
pub fn serialize_eureka_toml(config: &EurekaToml) -> ConfigResult<String> {
    ::toml::to_string_pretty(config)
        .map_err(|e| EurekaError::serialization(format!("TOML serialization error: {}", e), e))
}

/// Validate configuration completeness
pub fn validate_config(config: &EurekaToml) -> ConfigResult<()> {
    let url = match config.registry.url.as_deref() {
        Some(url) if !url.trim().is_empty() => url,
        _ => return Err(EurekaError::config("registry.url", "Registry URL is required in [registry] section")),
    };

    let parsed = url::Url::parse(url)
        .map_err(|e| EurekaError::config("registry.url", format!("Invalid URL '{}': {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(EurekaError::config(
            "registry.url",
            format!("Unsupported scheme '{}', expected http or https", parsed.scheme()),
        ));
    }

    match config.registry.app.as_deref() {
        Some(app) if !app.trim().is_empty() => {}
        _ => return Err(EurekaError::config("registry.app", "Application name is required in [registry] section")),
    }

    if let Some(instance_id) = &config.instance.instance_id {
        if instance_id.trim().is_empty() {
            return Err(EurekaError::config("instance.instance-id", "Instance id must not be empty"));
        }
    }

    if let Some(user_agent) = &config.transport.user_agent {
        if user_agent.is_empty() {
            return Err(EurekaError::config("transport.user-agent", "User agent must not be empty"));
        }
    }

    Ok(())
}

/// Load and parse eureka.toml from file path
pub async fn load_from_file(path: &camino::Utf8Path) -> ConfigResult<EurekaToml> {
    let content = tokio::fs::read_to_string(path).await
        .map_err(|e| EurekaError::io(format!("Failed to read {}", path), e))?;

    parse_eureka_toml(&content)
        .map_err(|e| match e {
            EurekaError::TomlParse { message, line, column } => EurekaError::TomlParse {
                message: format!("In file {}: {}", path, message),
                line,
                column,
            },
            other => other,
        })
}

/// Build a TomlParse error with a 1-based line/column from a byte span
fn located_error(content: &str, message: &str, span: Option<std::ops::Range<usize>>) -> EurekaError {
    let (line, column) = span
        .map(|span| line_column(content, span.start))
        .unwrap_or((0, 0));

    EurekaError::TomlParse {
        message: message.trim().to_string(),
        line,
        column,
    }
}

fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(content.len());
    let before = &content.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before.iter().rposition(|&b| b == b'\n').map(|i| i + 1).unwrap_or(0);
    (line, offset - line_start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[registry]
url = "http://127.0.0.1:8761/eureka/apps/app-go-native"
app = "app-go-native"
"#;

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_eureka_toml(MINIMAL).unwrap();
        assert_eq!(config.registry.app.as_deref(), Some("app-go-native"));
        assert_eq!(config.instance, InstanceSection::default());

        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.registration.instance.instance_id, "localhost:app-go-native:8080");
        assert_eq!(resolved.registration.auth_header, None);
        assert_eq!(resolved.credentials, Credentials::new("", ""));
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[registry]
url = "http://127.0.0.1:8761/eureka/apps/app-go-native"
app = "app-go-native"
username = "admin"
password = "admin"
auth-header = "Bearer abc"

[instance]
instance-id = "app-go-native-instance"
host-name = "svc.internal"
ip-addr = "10.1.2.3"
status = "OUT_OF_SERVICE"
port = 10000
secure-port = 8443
secure-port-enabled = true
status-page-url = "http://svc.internal:10000/actuator/info"
health-check-url = "http://svc.internal:10000/actuator/health"
country-id = 2

[instance.data-center]
class = "com.netflix.appinfo.AmazonInfo"
name = "Amazon"

[transport]
timeout-secs = 30
connect-timeout-secs = 5
"#;

        let resolved = parse_eureka_toml(toml).unwrap().resolve().unwrap();
        let instance = &resolved.registration.instance;

        assert_eq!(resolved.registration.custom_auth_header(), Some("Bearer abc"));
        assert_eq!(resolved.credentials, Credentials::new("admin", "admin"));
        assert_eq!(instance.instance_id, "app-go-native-instance");
        assert_eq!(instance.status, InstanceStatus::OutOfService);
        assert_eq!(instance.port, PortData::enabled(10000));
        assert_eq!(instance.secure_port, PortData::enabled(8443));
        assert_eq!(instance.home_page_url, "http://svc.internal:10000/");
        assert_eq!(instance.health_check_url, "http://svc.internal:10000/actuator/health");
        assert_eq!(instance.country_id, 2);
        assert_eq!(instance.data_center_info, DataCenterInfo::amazon());
        assert_eq!(resolved.transport.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(resolved.transport.connect_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_missing_url() {
        let config = parse_eureka_toml("[registry]\napp = \"orders\"\n").unwrap();

        match config.resolve().unwrap_err() {
            EurekaError::ConfigValidation { field, .. } => assert_eq!(field, "registry.url"),
            other => panic!("Expected ConfigValidation error, got {:?}", other),
        }
    }

    #[test]
    fn test_relative_url_rejected() {
        let config = parse_eureka_toml("[registry]\nurl = \"invalid-url\"\napp = \"orders\"\n").unwrap();
        assert!(matches!(config.resolve(), Err(EurekaError::ConfigValidation { .. })));
    }

    #[test]
    fn test_missing_app() {
        let config = parse_eureka_toml("[registry]\nurl = \"http://localhost:8761/eureka/apps/x\"\n").unwrap();

        match config.resolve().unwrap_err() {
            EurekaError::ConfigValidation { field, .. } => assert_eq!(field, "registry.app"),
            other => panic!("Expected ConfigValidation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_instance_id_rejected() {
        let toml = format!("{}\n[instance]\ninstance-id = \"\"\n", MINIMAL);
        let config = parse_eureka_toml(&toml).unwrap();
        assert!(config.resolve().is_err());
    }

    #[test]
    fn test_syntax_error_location() {
        let toml = "[registry]\nurl = \"http://localhost\"\napp = ";

        match parse_eureka_toml(toml).unwrap_err() {
            EurekaError::TomlParse { line, .. } => assert_eq!(line, 3),
            other => panic!("Expected TomlParse error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_status_literal() {
        let toml = format!("{}\n[instance]\nstatus = \"STARTING\"\n", MINIMAL);
        assert!(matches!(parse_eureka_toml(&toml), Err(EurekaError::TomlParse { .. })));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let toml = format!("{}\n[instance]\nhostname = \"typo\"\n", MINIMAL);
        assert!(parse_eureka_toml(&toml).is_err());
    }

    #[test]
    fn test_round_trip_serialization() {
        let toml = format!("{}\n[instance]\nport = 9090\nstatus = \"DOWN\"\n", MINIMAL);

        let config = parse_eureka_toml(&toml).unwrap();
        let serialized = serialize_eureka_toml(&config).unwrap();
        let reparsed = parse_eureka_toml(&serialized).unwrap();

        assert_eq!(config, reparsed);
    }

    #[test]
    fn test_line_column() {
        let content = "ab\ncd\nef";
        assert_eq!(line_column(content, 0), (1, 1));
        assert_eq!(line_column(content, 4), (2, 2));
        assert_eq!(line_column(content, 6), (3, 1));
    }
}
