//! Bearer-token HTTP client for polling fleet APIs

use crate::config::ToolsConfig;
use crate::error::{Result, ToolsError};
use bytes::Bytes;
use tracing::debug;

/// Build the HTTP client shared by the outbound tools
pub fn http_client(config: &ToolsConfig) -> Result<reqwest::Client> {
    http_client_builder(config).build().map_err(ToolsError::from)
}

pub(crate) fn http_client_builder(config: &ToolsConfig) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.http_timeout)
        .user_agent(concat!("fkit/", env!("CARGO_PKG_VERSION")))
}

/// GET `url` with `Authorization: Bearer <token>` and return the body
///
/// Any non-2xx status fails with [`ToolsError::Upstream`] carrying the body.
pub async fn api_get(client: &reqwest::Client, url: &str, token: &str) -> Result<Bytes> {
    let response = client
        .get(url)
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                ToolsError::Network(format!("Request to {} timed out", url))
            } else {
                ToolsError::Network(e.to_string())
            }
        })?;

    let status = response.status();
    let body = response.bytes().await?;
    debug!("GET {} returned {} ({} bytes)", url, status, body.len());

    if !status.is_success() {
        return Err(ToolsError::Upstream {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    Ok(body)
}
