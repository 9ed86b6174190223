//! # eureka-cli
//!
//! Register and deregister a service instance with a Eureka registry.
//!
//! This is the main entry point for the `eureka` tool. It handles command parsing,
//! sets up logging and error reporting, and dispatches to the command handlers.

use std::collections::HashMap;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use eureka_core::error::{EurekaError, EurekaResult};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Register a service instance with a Eureka registry
#[derive(Parser)]
#[command(name = "eureka", version, about = "Eureka instance registration client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the nearest eureka.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub overrides: Overrides,
}

/// Command line overrides, applied on top of file and environment settings
#[derive(clap::Args, Debug, Default)]
pub struct Overrides {
    /// Registry URL including the application path
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Application name
    #[arg(long, global = true)]
    pub app: Option<String>,

    /// Basic auth username
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Verbatim Authorization header used for registration
    #[arg(long, global = true)]
    pub auth_header: Option<String>,

    /// Instance id to register or deregister
    #[arg(long, global = true)]
    pub instance_id: Option<String>,
}

impl Overrides {
    /// Flatten into the key/value form the config layering expects
    pub fn into_map(self) -> HashMap<String, String> {
        [
            ("url", self.url),
            ("app", self.app),
            ("username", self.username),
            ("password", self.password),
            ("auth-header", self.auth_header),
            ("instance-id", self.instance_id),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key.to_string(), value)))
        .collect()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register the instance with the registry
    Register,
    /// Remove the instance from the registry
    Deregister,
    /// Register, wait for Ctrl-C or SIGTERM, then deregister
    Run,
    /// Validate configuration
    Check {
        /// Print the JSON body that `register` would send
        #[arg(long)]
        payload: bool,
    },
    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting eureka v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", ErrorFormatter::new().format_error(&e));
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: Cli) -> EurekaResult<()> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| EurekaError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new(cli.config, cli.overrides.into_map())?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "eureka={level},eureka_cli={level},eureka_client={level},eureka_config={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("eureka encountered an unexpected error: {}", panic_info);
        eprintln!("eureka crashed! This is a bug.");
        eprintln!("Error: {}", panic_info);
    }));
}
