//! Plain directory server

use crate::middleware::log_request_uri;
use axum::{middleware, Router};
use std::path::Path;
use tower_http::services::ServeDir;

/// Serve the subtree under `dir` at `/`
pub fn directory_router(dir: impl AsRef<Path>) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(dir.as_ref()))
        .layer(middleware::from_fn(log_request_uri))
}
