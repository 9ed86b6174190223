//! `eureka check` command implementation.
//!
//! Loads and validates the layered configuration without contacting the
//! registry, optionally printing the registration body.

use eureka_core::error::{EurekaError, EurekaResult};
use super::CommandContext;

/// Execute the `eureka check` command
pub async fn execute(payload: bool, ctx: &CommandContext) -> EurekaResult<()> {
    ctx.output.step("->", "Checking configuration...");

    let (config, source) = ctx.load_config().await?;
    let registration = &config.registration;
    let instance = &registration.instance;

    ctx.output.info(&format!("Source:      {}", source));
    ctx.output.info(&format!("Registry:    {}", registration.eureka_url));
    ctx.output.info(&format!("App:         {}", registration.app));
    ctx.output.info(&format!("Instance:    {}", instance.instance_id));
    ctx.output.info(&format!("Address:     {}:{} ({})", instance.host_name, instance.port.value, instance.ip_addr));
    ctx.output.info(&format!("Status:      {}", instance.status));
    ctx.output.info(&format!(
        "Auth:        {}",
        if registration.custom_auth_header().is_some() { "custom header (register), basic (deregister)" } else { "basic" }
    ));

    if payload {
        let body = eureka_client::encode_registration(instance)?;
        let value: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| EurekaError::serialization("Failed to re-read registration body".to_string(), e))?;
        let pretty = serde_json::to_string_pretty(&value)
            .map_err(|e| EurekaError::serialization("Failed to format registration body".to_string(), e))?;
        println!("{}", pretty);
    }

    ctx.output.success("Configuration is valid");
    Ok(())
}
