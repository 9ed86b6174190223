//! Command implementations and dispatch logic.
//!
//! Each command is implemented as an async function that takes a CommandContext.
//! The context carries the working directory, the output handler and whatever
//! overrides were given on the command line; configuration is loaded lazily by
//! the commands that need it.

use std::collections::HashMap;

use camino::Utf8PathBuf;
use eureka_client::{RegistryClient, TransportConfig};
use eureka_config::{ConfigLoader, ConfigSource, ResolvedConfig};
use eureka_core::error::{EurekaError, EurekaResult};
use tracing::info;

pub mod register;
pub mod deregister;
pub mod run;
pub mod check;


use crate::{Commands, output::OutputHandler};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
    pub config_path: Option<Utf8PathBuf>,
    pub overrides: HashMap<String, String>,
    /// Global config file; `None` means `~/.eureka/config.toml`
    pub global_config: Option<Utf8PathBuf>,
    /// Environment snapshot; `None` reads the process environment
    pub env: Option<HashMap<String, String>>,
}

impl CommandContext {
    /// Create a new command context rooted at the current directory
    pub fn new(config_path: Option<Utf8PathBuf>, overrides: HashMap<String, String>) -> EurekaResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| EurekaError::io("Failed to get current directory".to_string(), e))?;

        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|e| EurekaError::config("cwd", format!("Working directory is not valid UTF-8: {}", e)))?;

        Ok(Self {
            cwd,
            output: OutputHandler::new(),
            config_path,
            overrides,
            global_config: None,
            env: None,
        })
    }

    /// Load and validate the layered configuration
    pub async fn load_config(&self) -> EurekaResult<(ResolvedConfig, ConfigSource)> {
        let mut loader = ConfigLoader::new(self.cwd.clone());
        if let Some(path) = &self.global_config {
            loader = loader.with_global_config(path.clone());
        }
        if let Some(env) = &self.env {
            loader = loader.with_env(env.clone());
        }

        let (config, source) = loader
            .load(self.config_path.as_deref(), self.overrides.clone())
            .await?;

        info!("Loaded configuration from {}", source);
        Ok((config, source))
    }
}

/// Build a registry client from the `[transport]` settings
pub fn build_client(config: &ResolvedConfig) -> EurekaResult<RegistryClient> {
    let defaults = TransportConfig::default();
    let transport = TransportConfig {
        timeout: config.transport.timeout(),
        connect_timeout: config.transport.connect_timeout(),
        pool_max_idle_per_host: config.transport.pool_max_idle_per_host.unwrap_or(defaults.pool_max_idle_per_host),
        pool_idle_timeout: defaults.pool_idle_timeout,
        user_agent: config.transport.user_agent.clone().unwrap_or(defaults.user_agent),
    };

    RegistryClient::with_transport(transport)
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> EurekaResult<()> {
    match command {
        Commands::Register => {
            info!("Registering instance");
            register::execute(ctx).await
        }
        Commands::Deregister => {
            info!("Deregistering instance");
            deregister::execute(ctx).await
        }
        Commands::Run => {
            info!("Registering until shutdown");
            run::execute(ctx).await
        }
        Commands::Check { payload } => {
            info!("Checking configuration (payload: {})", payload);
            check::execute(payload, ctx).await
        }
        Commands::Version => {
            info!("Showing version information");
            show_version(ctx);
            Ok(())
        }
    }
}

fn show_version(ctx: &CommandContext) {
    let version = env!("CARGO_PKG_VERSION");
    let build_date = env!("BUILD_DATE");
    let target = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    ctx.output.info(&format!("eureka v{}", version));
    ctx.output.info(&format!("Built: {}", build_date));
    ctx.output.info(&format!("Target: {}", target));
    ctx.output.info(&format!("Rust: {}", env!("RUSTC_VERSION")));
}
