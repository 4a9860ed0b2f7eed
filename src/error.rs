//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Definition-time errors, raised while building or registering resource
/// classes. These are fatal and surface synchronously during startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("duplicate endpoint: '{endpoint}' already registered by resource '{existing}'")]
    DuplicateEndpoint { endpoint: String, existing: String },
    #[error("invalid resource '{resource}': {message}")]
    InvalidResource { resource: String, message: String },
}

/// Request-time errors, plus definition-time ones wrapped for HTTP mapping.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unknown relation: '{relation}' is not registered")]
    UnknownRelation { relation: String },
    #[error("missing property: '{field}'")]
    MissingProperty { field: String },
    #[error("validation: {field}: {message}")]
    Validation { field: String, message: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            ApiError::UnknownRelation { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "unknown_relation")
            }
            ApiError::MissingProperty { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "missing_property")
            }
            ApiError::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
