//! Fetches an API endpoint with a bearer token and prints the body
//!
//! Usage: fkit-api-get <url> <token>

use anyhow::bail;
use fkit_tools::{client, logging, ToolsConfig};
use std::io::Write;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (url, token) = match args.as_slice() {
        [url, token] => (url, token),
        _ => bail!("usage: fkit-api-get <url> <token>"),
    };

    let config = ToolsConfig::from_env();
    let http = client::http_client(&config)?;
    let body = client::api_get(&http, url, token).await?;

    std::io::stdout().write_all(&body)?;
    Ok(())
}
