//! Configuration layering, file discovery, and environment overrides

use std::collections::HashMap;
use camino::{Utf8Path, Utf8PathBuf};
use eureka_core::error::EurekaError;
use eureka_core::types::InstanceStatus;
use crate::{ConfigResult, toml::{EurekaToml, ResolvedConfig}};

/// Project configuration file name
pub const CONFIG_FILE_NAME: &str = "eureka.toml";

/// Prefix of environment variables that override configuration
pub const ENV_PREFIX: &str = "EUREKA_";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
    /// Global config file; `None` means `~/.eureka/config.toml`
    global_config_path: Option<Utf8PathBuf>,
    /// Environment snapshot; `None` reads the process environment
    env: Option<HashMap<String, String>>,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Where the project configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// eureka.toml found by walking up from the working directory
    ProjectToml(Utf8PathBuf),
    /// File passed explicitly with --config
    Explicit(Utf8PathBuf),
    /// No project file; global config, environment and flags only
    Layered,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            ConfigSource::ProjectToml(path) | ConfigSource::Explicit(path) => Some(path),
            ConfigSource::Layered => None,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.path() {
            Some(path) => write!(f, "{}", path),
            None => write!(f, "environment and command line (no {})", CONFIG_FILE_NAME),
        }
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self {
            cwd,
            global_config_path: None,
            env: None,
        }
    }

    /// Read the global config from `path` instead of the home directory
    pub fn with_global_config(mut self, path: Utf8PathBuf) -> Self {
        self.global_config_path = Some(path);
        self
    }

    /// Take `EUREKA_*` overrides from `env` instead of the process environment
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    /// Load, layer and validate everything in one go
    ///
    /// Order, lowest priority first: global config, project (or explicit)
    /// file, `EUREKA_*` environment variables, command line overrides.
    pub async fn load(
        &self,
        explicit: Option<&Utf8Path>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<(ResolvedConfig, ConfigSource)> {
        let (project, source) = match explicit {
            Some(path) => self.load_explicit_config(path).await?,
            None => self.load_project_config().await?,
        };
        let global = self.load_global_config().await?;

        let env_overrides = match &self.env {
            Some(env) => env.iter()
                .filter(|(key, _)| key.starts_with(ENV_PREFIX))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            None => ConfigLayering::collect_env_overrides(),
        };

        let merged = ConfigLayering::merge_configs(global, project, env_overrides, cli_overrides)?;

        let origin = match source.path() {
            Some(path) => format!("loaded from {}", path),
            None => format!("no {} found", CONFIG_FILE_NAME),
        };
        let resolved = merged.resolve()
            .map_err(|e| match e {
                EurekaError::ConfigValidation { field, reason } => EurekaError::ConfigValidation {
                    field,
                    reason: format!("{} ({})", reason, origin),
                },
                other => other,
            })?;

        Ok((resolved, source))
    }

    /// Load project configuration found by walking up the directory tree
    ///
    /// A missing file is an empty layer; the merged result is validated later.
    pub async fn load_project_config(&self) -> ConfigResult<(EurekaToml, ConfigSource)> {
        let path = self.resolve_config_path(CONFIG_FILE_NAME)?;
        if path.exists() {
            let config = crate::toml::load_from_file(&path).await?;
            return Ok((config, ConfigSource::ProjectToml(path)));
        }

        Ok((EurekaToml::default(), ConfigSource::Layered))
    }

    /// Load configuration from a path given on the command line
    pub async fn load_explicit_config(&self, path: &Utf8Path) -> ConfigResult<(EurekaToml, ConfigSource)> {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        };

        let config = crate::toml::load_from_file(&path).await?;
        Ok((config, ConfigSource::Explicit(path)))
    }

    /// Find configuration file in project (walks up directory tree)
    pub fn resolve_config_path(&self, filename: &str) -> ConfigResult<Utf8PathBuf> {
        let mut current = self.cwd.as_path();

        loop {
            let config_path = current.join(filename);
            if config_path.exists() {
                return Ok(config_path);
            }

            // Move up one directory
            if let Some(parent) = current.parent() {
                current = parent;
            } else {
                // Reached filesystem root
                break;
            }
        }

        // Return path in current directory even if it doesn't exist
        Ok(self.cwd.join(filename))
    }

    /// Load global configuration, by default from ~/.eureka/config.toml
    pub async fn load_global_config(&self) -> ConfigResult<Option<EurekaToml>> {
        let global_config_path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => {
                let Some(home_dir) = dirs::home_dir() else {
                    return Ok(None);
                };

                Utf8PathBuf::try_from(home_dir)
                    .map_err(|e| EurekaError::ConfigValidation {
                        field: "home_dir".to_string(),
                        reason: format!("Invalid home directory path: {}", e),
                    })?
                    .join(".eureka")
                    .join("config.toml")
            }
        };

        if global_config_path.exists() {
            let config = crate::toml::load_from_file(&global_config_path).await?;
            Ok(Some(config))
        } else {
            Ok(None)
        }
    }
}

impl ConfigLayering {
    /// Merge multiple configuration layers
    pub fn merge_configs(
        global_config: Option<EurekaToml>,
        project_config: EurekaToml,
        env_overrides: HashMap<String, String>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<EurekaToml> {
        let mut merged = project_config;

        // Apply global config as base (if present)
        if let Some(global) = global_config {
            let registry = &mut merged.registry;
            registry.url = registry.url.take().or(global.registry.url);
            registry.app = registry.app.take().or(global.registry.app);
            registry.username = registry.username.take().or(global.registry.username);
            registry.password = registry.password.take().or(global.registry.password);
            registry.auth_header = registry.auth_header.take().or(global.registry.auth_header);

            let transport = &mut merged.transport;
            transport.timeout_secs = transport.timeout_secs.or(global.transport.timeout_secs);
            transport.connect_timeout_secs = transport.connect_timeout_secs.or(global.transport.connect_timeout_secs);
            transport.pool_max_idle_per_host = transport.pool_max_idle_per_host.or(global.transport.pool_max_idle_per_host);
            transport.user_agent = transport.user_agent.take().or(global.transport.user_agent);
        }

        // Apply environment variable overrides
        Self::apply_env_overrides(&mut merged, &env_overrides)?;

        // Apply CLI flag overrides (highest priority)
        Self::apply_cli_overrides(&mut merged, &cli_overrides)?;

        Ok(merged)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(config: &mut EurekaToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };

            match name {
                "URL" => config.registry.url = Some(value.clone()),
                "APP" => config.registry.app = Some(value.clone()),
                "USERNAME" => config.registry.username = Some(value.clone()),
                "PASSWORD" => config.registry.password = Some(value.clone()),
                "AUTH_HEADER" => config.registry.auth_header = Some(value.clone()),
                "INSTANCE_ID" => config.instance.instance_id = Some(value.clone()),
                "HOST_NAME" => config.instance.host_name = Some(value.clone()),
                "IP_ADDR" => config.instance.ip_addr = Some(value.clone()),
                "PORT" => config.instance.port = Some(parse_port(key, value)?),
                "STATUS" => config.instance.status = Some(parse_status(key, value)?),
                _ => {
                    // Unknown environment variable, ignore
                }
            }
        }

        Ok(())
    }

    /// Apply CLI flag overrides
    fn apply_cli_overrides(config: &mut EurekaToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "url" => config.registry.url = Some(value.clone()),
                "app" => config.registry.app = Some(value.clone()),
                "username" => config.registry.username = Some(value.clone()),
                "password" => config.registry.password = Some(value.clone()),
                "auth-header" => config.registry.auth_header = Some(value.clone()),
                "instance-id" => config.instance.instance_id = Some(value.clone()),
                _ => {
                    // Unknown CLI override, ignore
                }
            }
        }

        Ok(())
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect()
    }
}

fn parse_port(field: &str, value: &str) -> ConfigResult<u16> {
    value.parse()
        .map_err(|e| EurekaError::config(field, format!("Invalid port '{}': {}", value, e)))
}

fn parse_status(field: &str, value: &str) -> ConfigResult<InstanceStatus> {
    value.parse()
        .map_err(|reason: String| EurekaError::config(field, reason))
}
