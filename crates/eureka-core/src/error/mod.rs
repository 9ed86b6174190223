//! Error types and result aliases for registry operations.
//!
//! Provides a unified error type that covers every failure a registration,
//! deregistration or configuration load can surface, with actionable messages.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Unified error type for all Eureka client operations
#[derive(Error, Debug)]
pub enum EurekaError {
    // Config errors
    #[error("Failed to parse eureka.toml: {message} at line {line}, column {column}")]
    TomlParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Client errors
    #[error("Failed to serialize instance descriptor: {message}")]
    Serialization {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to build registry request: {message}")]
    RequestBuild {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    // Registry responses
    #[error("Registration rejected by registry. Status code: {status}")]
    RegistrationRejected { status: u16 },

    #[error("Deregistration rejected by registry. Status code: {status}")]
    DeregistrationRejected { status: u16 },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Eureka operations
pub type EurekaResult<T> = Result<T, EurekaError>;

impl EurekaError {
    /// Create a serialization error from any error type
    pub fn serialization<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Serialization {
            message,
            source: Box::new(source),
        }
    }

    /// Create a request construction error from any error type
    pub fn request_build<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::RequestBuild {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create a transport error from any error type
    pub fn transport<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create a validation error for a named config field
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Status code returned by the registry, if the error came from a response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            EurekaError::RegistrationRejected { status }
            | EurekaError::DeregistrationRejected { status } => Some(*status),
            _ => None,
        }
    }

    /// Whether the registry answered but refused the request
    pub fn is_rejection(&self) -> bool {
        self.status_code().is_some()
    }

    /// Check if retrying the same call could plausibly succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            EurekaError::Transport { .. } => true,
            EurekaError::RegistrationRejected { status }
            | EurekaError::DeregistrationRejected { status } => *status >= 500,
            _ => false,
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            EurekaError::TomlParse { .. } => Some("Fix the syntax of eureka.toml at the reported location"),
            EurekaError::ConfigValidation { .. } => {
                Some("Set the field in eureka.toml, an EUREKA_* variable or a command line flag")
            },
            EurekaError::RequestBuild { .. } => {
                Some("Check that the registry URL is absolute and the auth header is plain ASCII")
            },
            EurekaError::Transport { .. } => {
                Some("Check that the registry is running and reachable from this host")
            },
            EurekaError::RegistrationRejected { status: 401 | 403 }
            | EurekaError::DeregistrationRejected { status: 401 | 403 } => {
                Some("Check the registry username and password, or the custom auth header")
            },
            EurekaError::DeregistrationRejected { status: 404 } => {
                Some("The instance is not registered under this id; it may have already expired")
            },
            EurekaError::RegistrationRejected { .. } => {
                Some("Check that the registry URL ends with the application path, e.g. /eureka/apps/<app>")
            },
            _ => None,
        }
    }
}
