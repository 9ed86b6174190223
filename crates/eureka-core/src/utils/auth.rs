//! HTTP Basic authorization encoding.

use base64::{engine::general_purpose, Engine as _};

/// Encode `username:password` with standard, padded base64
pub fn encode_basic_credentials(username: &str, password: &str) -> String {
    general_purpose::STANDARD.encode(format!("{}:{}", username, password))
}

/// Full `Authorization` header value for Basic auth
pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!("Basic {}", encode_basic_credentials(username, password))
}
