//! Error types for the fkit tools
//!
//! HTTP handlers turn these into a JSON body `{message, type, code}` with a
//! matching status; command-line tools surface them from `main`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main error type for the tools
#[derive(Debug, Error)]
pub enum ToolsError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Failed to parse JSON body: {0}")]
    BadJson(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Certificate error: {0}")]
    Certificate(String),

    #[error("CSR verify failed")]
    CsrVerifyFailed,

    #[error("Invalid pattern: {0}")]
    Pattern(String),

    #[error("Upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Gate(#[from] fkit_core::Error),
}

impl ToolsError {
    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "general_bad_request",
            Self::BadJson(_) => "general_bad_json",
            Self::NotFound(_) => "general_not_found",
            Self::Tls(_) => "tls_failed",
            Self::Certificate(_) => "certificate_invalid",
            Self::CsrVerifyFailed => "csr_verify_failed",
            Self::Pattern(_) => "pattern_invalid",
            Self::Upstream { .. } => "upstream_failed",
            Self::Network(_) => "general_unknown",
            Self::Storage(_) => "general_unknown",
            Self::Gate(fkit_core::Error::ModeMismatch { .. }) => "mode_mismatch",
            Self::Gate(fkit_core::Error::NotADirectory(_)) => "not_a_directory",
            Self::Gate(fkit_core::Error::FileTypeMismatch { .. }) => "mode_invalid",
            Self::Gate(fkit_core::Error::Io(_)) => "general_unknown",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::BadJson(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Tls(_) => StatusCode::BAD_GATEWAY,
            Self::Certificate(_) => StatusCode::BAD_REQUEST,
            Self::CsrVerifyFailed => StatusCode::BAD_REQUEST,
            Self::Pattern(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Network(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Gate(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    message: String,
    r#type: String,
    code: u16,
}

impl IntoResponse for ToolsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            message: self.to_string(),
            r#type: self.error_type().to_string(),
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<std::io::Error> for ToolsError {
    fn from(err: std::io::Error) -> Self {
        ToolsError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for ToolsError {
    fn from(err: reqwest::Error) -> Self {
        ToolsError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ToolsError {
    fn from(err: serde_json::Error) -> Self {
        ToolsError::BadJson(err.to_string())
    }
}

impl From<regex::Error> for ToolsError {
    fn from(err: regex::Error) -> Self {
        ToolsError::Pattern(err.to_string())
    }
}

impl From<rustls::Error> for ToolsError {
    fn from(err: rustls::Error) -> Self {
        ToolsError::Tls(err.to_string())
    }
}

/// Result type alias for tool operations
pub type Result<T> = std::result::Result<T, ToolsError>;
