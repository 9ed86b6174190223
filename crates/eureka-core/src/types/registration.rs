//! Registration target and credentials.

use std::fmt;

use super::InstanceDescriptor;
use crate::utils::auth::basic_auth_header;

/// Where and how to register an instance
///
/// `eureka_url` already includes the application path segment, e.g.
/// `http://127.0.0.1:8761/eureka/apps/orders`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationConfig {
    pub eureka_url: String,
    pub app: String,
    pub instance: InstanceDescriptor,
    /// Verbatim `Authorization` value; replaces Basic auth on register only
    pub auth_header: Option<String>,
}

impl RegistrationConfig {
    pub fn new(eureka_url: impl Into<String>, app: impl Into<String>, instance: InstanceDescriptor) -> Self {
        Self {
            eureka_url: eureka_url.into(),
            app: app.into(),
            instance,
            auth_header: None,
        }
    }

    pub fn with_auth_header(mut self, auth_header: impl Into<String>) -> Self {
        self.auth_header = Some(auth_header.into());
        self
    }

    /// Custom authorization override, with an empty value treated as unset
    pub fn custom_auth_header(&self) -> Option<&str> {
        self.auth_header.as_deref().filter(|value| !value.is_empty())
    }

    /// Resource path of this instance: `{eureka_url}/{instance_id}`
    pub fn instance_url(&self) -> String {
        format!("{}/{}", self.eureka_url, self.instance.instance_id)
    }
}

/// Basic-auth username/password pair
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `Basic base64(username:password)`
    pub fn basic_auth_header(&self) -> String {
        basic_auth_header(&self.username, &self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
