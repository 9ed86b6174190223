//! `eureka deregister` command implementation.

use eureka_core::error::EurekaResult;
use super::{build_client, CommandContext};

/// Execute the `eureka deregister` command
pub async fn execute(ctx: &CommandContext) -> EurekaResult<()> {
    let (config, _) = ctx.load_config().await?;
    let client = build_client(&config)?;

    let registration = &config.registration;
    if registration.custom_auth_header().is_some() {
        // Deregistration always authenticates with Basic credentials
        ctx.output.warn("auth-header is not used for deregistration; sending Basic credentials");
    }

    ctx.output.step("->", &format!("Deregistering {}", registration.instance_url()));

    client.deregister(registration, &config.credentials).await?;

    ctx.output.success(&format!("Deregistered {} ({})", registration.app, registration.instance.instance_id));
    Ok(())
}
