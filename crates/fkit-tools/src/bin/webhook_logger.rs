//! Logs JSON webhook payloads
//!
//! Usage: fkit-webhook-logger <port>

use anyhow::{bail, Context};
use fkit_tools::{logging, routes::webhook_router, server, ToolsConfig};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let port = match args.as_slice() {
        [port] => port
            .parse::<u16>()
            .with_context(|| format!("invalid port {}", port))?,
        _ => bail!("usage: fkit-webhook-logger <port>"),
    };

    let runtime = server::build_runtime("fkit-webhook")?;
    runtime.block_on(async_main(port))
}

async fn async_main(port: u16) -> anyhow::Result<()> {
    logging::init();

    let config = ToolsConfig::from_env();
    let app = webhook_router(config.max_body_size);

    server::serve(app, &config.listen_addr(port)).await?;
    Ok(())
}
