//! `eureka register` command implementation.

use eureka_core::error::EurekaResult;
use super::{build_client, CommandContext};

/// Execute the `eureka register` command
pub async fn execute(ctx: &CommandContext) -> EurekaResult<()> {
    let (config, _) = ctx.load_config().await?;
    let client = build_client(&config)?;

    let registration = &config.registration;
    ctx.output.step(
        "->",
        &format!("Registering {} with {}", registration.instance.instance_id, registration.eureka_url),
    );

    client.register(registration, &config.credentials).await?;

    ctx.output.success(&format!("Registered {} ({})", registration.app, registration.instance.instance_id));
    Ok(())
}
