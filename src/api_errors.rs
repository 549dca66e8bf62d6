use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    ServiceUnavailable(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[derive(Serialize)]
struct ErrBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, msg) = match &self {
            AppError::BadRequest(s) => (StatusCode::BAD_REQUEST, s),
            AppError::Unauthorized(s) => (StatusCode::UNAUTHORIZED, s),
            AppError::NotFound(s) => (StatusCode::NOT_FOUND, s),
            AppError::ServiceUnavailable(s) => (StatusCode::SERVICE_UNAVAILABLE, s),
            AppError::Internal(s) => (StatusCode::INTERNAL_SERVER_ERROR, s),
        };
        (code, Json(ErrBody { error: msg.clone() })).into_response()
    }
}

// Conversion from String to AppError
impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::Internal(s)
    }
}

// Conversion from the core AdvisorError to AppError
impl From<crate::errors::AdvisorError> for AppError {
    fn from(err: crate::errors::AdvisorError) -> Self {
        use crate::errors::AdvisorError;
        match err {
            AdvisorError::Config { message } => AppError::ServiceUnavailable(message),
            AdvisorError::Validation { field, message } => {
                AppError::BadRequest(format!("Validation error for {field}: {message}"))
            }
            AdvisorError::Io { operation, source } => {
                AppError::Internal(format!("I/O {operation} failed: {source}"))
            }
            AdvisorError::Serialization { context, source } => {
                AppError::BadRequest(format!("Serialization {context} failed: {source}"))
            }
            AdvisorError::Auth { message } => AppError::Unauthorized(message),
            AdvisorError::Session { message } => AppError::Unauthorized(message),
            AdvisorError::Network { operation, source } => {
                AppError::Internal(format!("Network {operation} failed: {source}"))
            }
            AdvisorError::Artifact { name, message } => {
                AppError::ServiceUnavailable(format!("Model artifact {name}: {message}"))
            }
            AdvisorError::NotFound { resource, id } => {
                AppError::NotFound(format!("Resource '{resource}' with ID '{id}' not found"))
            }
            AdvisorError::Internal { message } => AppError::Internal(message),
        }
    }
}
