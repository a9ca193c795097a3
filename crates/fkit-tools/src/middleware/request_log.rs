//! Request URI logging

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::info;

/// Log every request URI before handing the request on
pub async fn log_request_uri(request: Request, next: Next) -> Response {
    info!(method = %request.method(), "{}", request.uri());
    next.run(request).await
}
