//! Error types for the cropmind service.
//!
//! Every fallible component converts its failures into [`AdvisorError`] at the
//! boundary where they occur; nothing in the core unwinds past the component
//! that detected the problem.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Main error type for the cropmind service.
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Authentication error: {message}")]
    Auth { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Network operation failed: {operation}")]
    Network {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Model artifact error: {name} - {message}")]
    Artifact { name: String, message: String },

    #[error("Resource not found: {resource} - {id}")]
    NotFound { resource: String, id: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Type alias for Result with AdvisorError.
pub type AdvisorResult<T> = Result<T, AdvisorError>;

impl AdvisorError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Create an authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a session error
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(operation: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            operation: operation.into(),
            source,
        }
    }

    /// Create a model artifact error
    pub fn artifact(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Artifact {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl IntoResponse for AdvisorError {
    fn into_response(self) -> Response {
        let status = match self {
            AdvisorError::Config { .. }
            | AdvisorError::Validation { .. }
            | AdvisorError::Serialization { .. } => StatusCode::BAD_REQUEST,
            AdvisorError::Auth { .. } | AdvisorError::Session { .. } => StatusCode::UNAUTHORIZED,
            AdvisorError::NotFound { .. } => StatusCode::NOT_FOUND,
            AdvisorError::Network { .. } => StatusCode::BAD_GATEWAY,
            AdvisorError::Io { .. }
            | AdvisorError::Artifact { .. }
            | AdvisorError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

/// Convert from serde_json errors
impl From<serde_json::Error> for AdvisorError {
    fn from(err: serde_json::Error) -> Self {
        AdvisorError::serialization("json_operation", err)
    }
}

/// Convert from std::io errors
impl From<std::io::Error> for AdvisorError {
    fn from(err: std::io::Error) -> Self {
        AdvisorError::io("io_operation", err)
    }
}

/// Convert from reqwest errors
impl From<reqwest::Error> for AdvisorError {
    fn from(err: reqwest::Error) -> Self {
        AdvisorError::network("http_request", err)
    }
}

/// Convert from String errors
impl From<String> for AdvisorError {
    fn from(err: String) -> Self {
        AdvisorError::Internal { message: err }
    }
}
