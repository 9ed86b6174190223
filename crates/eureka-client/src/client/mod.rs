//! HTTP client implementation for instance registration and deregistration

use std::time::Duration;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Response, StatusCode, Url};
use tracing::{debug, info, warn};

use eureka_core::error::EurekaError;
use eureka_core::types::{Credentials, RegistrationConfig};
use crate::RegistryResult;

/// Transport tuning for the underlying HTTP client
///
/// These are knobs of the connection pool only. Registration itself never
/// retries and adds no deadline beyond what is configured here.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whole-request timeout; `None` leaves the transport default (no timeout)
    pub timeout: Option<Duration>,
    /// Connect timeout; `None` leaves the transport default
    pub connect_timeout: Option<Duration>,
    /// Idle connections kept per registry host
    pub pool_max_idle_per_host: usize,
    /// How long an idle pooled connection is kept
    pub pool_idle_timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            pool_max_idle_per_host: 8,
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: format!("eureka-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Stateless client for the registry's instance endpoints
///
/// Holds nothing but the pooled HTTP client, so it is cheap to clone and safe
/// to share across tasks. Every call receives its configuration and
/// credentials as arguments.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    /// Underlying HTTP client with connection pooling
    client: Client,
}

impl RegistryClient {
    /// Create registry client with default transport settings
    pub fn new() -> RegistryResult<Self> {
        Self::with_transport(TransportConfig::default())
    }

    /// Create registry client with custom transport settings
    pub fn with_transport(transport: TransportConfig) -> RegistryResult<Self> {
        let mut builder = ClientBuilder::new()
            // Connection pooling configuration
            .pool_max_idle_per_host(transport.pool_max_idle_per_host)
            .pool_idle_timeout(transport.pool_idle_timeout)
            .user_agent(transport.user_agent);

        if let Some(timeout) = transport.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = transport.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        let client = builder.build()
            .map_err(|e| EurekaError::transport(format!("Failed to create HTTP client: {}", e), e))?;

        Ok(Self::from_client(client))
    }

    /// Wrap an existing HTTP client, sharing its connection pool
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Register `config.instance` with the registry
    ///
    /// POSTs `{"instance": ...}` to `config.eureka_url`. A custom auth header in
    /// the config is sent verbatim; otherwise Basic auth is computed from
    /// `credentials`. Only `204 No Content` counts as success.
    pub async fn register(&self, config: &RegistrationConfig, credentials: &Credentials) -> RegistryResult<()> {
        let body = crate::api::encode_registration(&config.instance)?;

        let authorization = match config.custom_auth_header() {
            Some(custom) => custom.to_string(),
            None => credentials.basic_auth_header(),
        };

        let url = parse_url(&config.eureka_url)?;
        debug!(%url, app = %config.app, instance_id = %config.instance.instance_id, "POST registration");

        let response = self.client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(AUTHORIZATION, auth_value(&authorization)?)
            .body(body)
            .send()
            .await
            .map_err(|e| send_error("register", e))?;

        let status = response.status();
        discard_body(response).await;

        if status != StatusCode::NO_CONTENT {
            return Err(EurekaError::RegistrationRejected { status: status.as_u16() });
        }

        info!(app = %config.app, instance_id = %config.instance.instance_id, "Registered in Eureka successfully");
        Ok(())
    }

    /// Remove `config.instance` from the registry
    ///
    /// DELETEs `{eureka_url}/{instance_id}`. Always uses Basic auth from
    /// `credentials`; the custom auth header is not consulted here. Only
    /// `200 OK` counts as success.
    pub async fn deregister(&self, config: &RegistrationConfig, credentials: &Credentials) -> RegistryResult<()> {
        let authorization = credentials.basic_auth_header();

        let url = parse_url(&config.instance_url())?;
        debug!(%url, app = %config.app, instance_id = %config.instance.instance_id, "DELETE registration");

        let response = self.client
            .delete(url)
            .header(AUTHORIZATION, auth_value(&authorization)?)
            .send()
            .await
            .map_err(|e| send_error("deregister", e))?;

        let status = response.status();
        discard_body(response).await;

        if status != StatusCode::OK {
            return Err(EurekaError::DeregistrationRejected { status: status.as_u16() });
        }

        info!(app = %config.app, instance_id = %config.instance.instance_id, "Deregistered from Eureka successfully");
        Ok(())
    }
}

/// Parse the request target, reporting bad URLs as request construction errors
fn parse_url(raw: &str) -> RegistryResult<Url> {
    Url::parse(raw)
        .map_err(|e| EurekaError::request_build(format!("Invalid registry URL '{}': {}", raw, e), e))
}

/// Build the `Authorization` header value, marked sensitive so it never shows in debug output
fn auth_value(authorization: &str) -> RegistryResult<HeaderValue> {
    let mut value = HeaderValue::from_str(authorization)
        .map_err(|e| EurekaError::request_build(format!("Invalid Authorization header: {}", e), e))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Map a failed `send()` to the matching error kind
fn send_error(operation: &str, error: reqwest::Error) -> EurekaError {
    if error.is_builder() {
        EurekaError::request_build(format!("Failed to build {} request: {}", operation, error), error)
    } else {
        EurekaError::transport(format!("Failed to {} instance: {}", operation, error), error)
    }
}

/// Read the response body to the end so the connection returns to the pool
///
/// Chunks are dropped as they arrive and never inspected. The response is
/// consumed here, so the stream is released whether or not reading succeeds.
async fn discard_body(mut response: Response) {
    loop {
        match response.chunk().await {
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to drain registry response body: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests;
