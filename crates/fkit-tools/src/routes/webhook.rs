//! Webhook logger: pretty-prints JSON payloads into the log

use crate::error::{Result, ToolsError};
use axum::{
    body::Bytes,
    extract::DefaultBodyLimit,
    http::{Method, StatusCode, Uri},
    Router,
};
use serde_json::Value;
use tracing::{info, warn};

/// Accept JSON on any path and method, log it, answer 200
pub fn webhook_router(max_body_size: usize) -> Router {
    Router::new()
        .fallback(webhook_handler)
        .layer(DefaultBodyLimit::max(max_body_size))
}

async fn webhook_handler(method: Method, uri: Uri, body: Bytes) -> Result<StatusCode> {
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejected non-JSON webhook on {} {}: {}", method, uri.path(), e);
        ToolsError::from(e)
    })?;

    let pretty = serde_json::to_string_pretty(&payload)?;
    info!("Webhook {} {}\n{}", method, uri.path(), pretty);

    Ok(StatusCode::OK)
}
