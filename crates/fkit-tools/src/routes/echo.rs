//! Echo server: answers every request with the request itself

use axum::{
    body::Bytes,
    extract::DefaultBodyLimit,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri, Version},
    response::{IntoResponse, Response},
    Router,
};
use tracing::info;

/// Echo every request, on any path and method
pub fn echo_router(max_body_size: usize) -> Router {
    Router::new()
        .fallback(echo_handler)
        .layer(DefaultBodyLimit::max(max_body_size))
}

async fn echo_handler(
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    info!(
        method = %method,
        path = uri.path(),
        body = %String::from_utf8_lossy(&body),
        "Echo request"
    );

    let dump = dump_request(&method, &uri, version, &headers, &body);

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )],
        dump,
    )
        .into_response()
}

/// Wire-style rendering of a request: request line, headers, blank line, body
///
/// `Host` comes first, taken from the header or else the URI authority.
pub fn dump_request(
    method: &Method,
    uri: &Uri,
    version: Version,
    headers: &HeaderMap,
    body: &[u8],
) -> Vec<u8> {
    let target = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");

    let mut out = format!("{} {} {:?}\r\n", method, target, version).into_bytes();

    let host = headers
        .get(header::HOST)
        .map(|h| String::from_utf8_lossy(h.as_bytes()).into_owned())
        .or_else(|| uri.authority().map(|a| a.to_string()));
    if let Some(host) = host {
        out.extend_from_slice(format!("Host: {}\r\n", host).as_bytes());
    }

    for (name, value) in headers.iter().filter(|(name, _)| *name != header::HOST) {
        out.extend_from_slice(name.as_str().as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(b"\r\n");
    }

    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(body);
    out
}
