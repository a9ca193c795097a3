//! Request-scoped client certificate serial number
//!
//! The serial lives in the request extensions under a private key type, so
//! only this module can store or read it. A TLS-terminating proxy in front of
//! the server forwards it in the `X-Client-Cert-Serial` header.

use crate::error::ToolsError;
use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, Extensions},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Header carrying the client certificate serial, decimal or `0x`-prefixed hex
pub const SERIAL_HEADER: &str = "x-client-cert-serial";

#[derive(Debug, Clone, Copy)]
struct SerialKey(u64);

/// Store `serial` in the request extensions
pub fn with_serial(extensions: &mut Extensions, serial: u64) {
    extensions.insert(SerialKey(serial));
}

/// Serial stored by [`with_serial`], if any
pub fn serial_number(extensions: &Extensions) -> Option<u64> {
    extensions.get::<SerialKey>().map(|key| key.0)
}

fn parse_serial(value: &str) -> Option<u64> {
    let value = value.trim();
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

/// Copy the forwarded serial header into the request extensions
///
/// Requests without the header pass through untouched; a header that is not
/// a valid u64 is rejected.
pub async fn serial_from_header(mut request: Request, next: Next) -> Result<Response, Response> {
    let header = request
        .headers()
        .get(SERIAL_HEADER)
        .map(|v| v.to_str().ok().and_then(parse_serial));

    match header {
        None => {}
        Some(Some(serial)) => with_serial(request.extensions_mut(), serial),
        Some(None) => {
            return Err(
                ToolsError::BadRequest("Invalid client certificate serial".to_string())
                    .into_response(),
            )
        }
    }

    Ok(next.run(request).await)
}

/// Extractor for handlers that require a client certificate serial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSerial(pub u64);

impl<S> FromRequestParts<S> for ClientSerial
where
    S: Send + Sync,
{
    type Rejection = ToolsError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        serial_number(&parts.extensions)
            .map(ClientSerial)
            .ok_or_else(|| ToolsError::BadRequest("Missing client certificate serial".to_string()))
    }
}
