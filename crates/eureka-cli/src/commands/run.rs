//! `eureka run` command implementation.
//!
//! Registers the instance, keeps it registered until the process is asked to
//! stop, then deregisters it. Nothing is renewed in between; the registry's
//! own lease handling applies.

use std::future::Future;

use eureka_core::error::{EurekaError, EurekaResult};
use tracing::{info, warn};
use super::{build_client, CommandContext};

/// Execute the `eureka run` command
pub async fn execute(ctx: &CommandContext) -> EurekaResult<()> {
    execute_until(ctx, shutdown_signal()).await
}

/// Register, wait for `shutdown`, then deregister
///
/// A failed registration returns immediately without waiting. A failure to
/// install the signal handlers still deregisters before reporting.
pub async fn execute_until<F>(ctx: &CommandContext, shutdown: F) -> EurekaResult<()>
where
    F: Future<Output = EurekaResult<()>>,
{
    let (config, _) = ctx.load_config().await?;
    let client = build_client(&config)?;
    let registration = &config.registration;

    client.register(registration, &config.credentials).await?;
    ctx.output.success(&format!("Registered {} ({})", registration.app, registration.instance.instance_id));
    ctx.output.info("Press Ctrl+C to deregister and exit.");

    let waited = shutdown.await;
    if let Err(e) = &waited {
        warn!("Stopped waiting for shutdown signal: {}", e);
    }

    ctx.output.step("->", "Shutting down, deregistering instance");
    client.deregister(registration, &config.credentials).await?;
    ctx.output.success(&format!("Deregistered {} ({})", registration.app, registration.instance.instance_id));

    waited
}

/// Resolve on Ctrl+C, or SIGTERM on unix
pub async fn shutdown_signal() -> EurekaResult<()> {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| EurekaError::io("Failed to install Ctrl+C handler".to_string(), e))
    };

    #[cfg(unix)]
    let terminate = async {
        let mut signal = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .map_err(|e| EurekaError::io("Failed to install SIGTERM handler".to_string(), e))?;
        signal.recv().await;
        Ok::<(), EurekaError>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<EurekaResult<()>>();

    tokio::select! {
        result = ctrl_c => {
            info!("Ctrl+C received, shutting down");
            result
        }
        result = terminate => {
            info!("SIGTERM received, shutting down");
            result
        }
    }
}
