//! Static file server for a locally packaged browser extension

use crate::middleware::log_request_uri;
use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::Response,
    Router,
};
use std::path::Path;
use tower_http::services::ServeDir;

/// Request paths ending in this suffix are served as extension packages
pub const EXTENSION_SUFFIX: &str = ".crx";

/// Content type browsers expect for extension packages
pub const EXTENSION_CONTENT_TYPE: &str = "application/x-chrome-extension";

/// Serve the tree under `root`, labelling extension packages
///
/// Every request URI is logged. Responses for paths ending in
/// [`EXTENSION_SUFFIX`] carry [`EXTENSION_CONTENT_TYPE`]; everything else
/// keeps the content type inferred by the file service.
pub fn extension_router(root: impl AsRef<Path>) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(root.as_ref()))
        .layer(middleware::from_fn(extension_content_type))
        .layer(middleware::from_fn(log_request_uri))
}

async fn extension_content_type(request: Request, next: Next) -> Response {
    let is_extension = request.uri().path().ends_with(EXTENSION_SUFFIX);

    let mut response = next.run(request).await;

    if is_extension {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(EXTENSION_CONTENT_TYPE),
        );
    }

    response
}
