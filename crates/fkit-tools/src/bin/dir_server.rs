//! Serves a directory over HTTP
//!
//! Usage: fkit-dir-server <port> <dir>

use anyhow::{bail, Context};
use fkit_tools::{logging, routes::directory_router, server, ToolsConfig};
use std::path::PathBuf;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (port, dir) = match args.as_slice() {
        [port, dir] => (
            port.parse::<u16>()
                .with_context(|| format!("invalid port {}", port))?,
            PathBuf::from(dir),
        ),
        _ => bail!("usage: fkit-dir-server <port> <dir>"),
    };

    let runtime = server::build_runtime("fkit-dir")?;
    runtime.block_on(async_main(port, dir))
}

async fn async_main(port: u16, dir: PathBuf) -> anyhow::Result<()> {
    logging::init();

    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let config = ToolsConfig::from_env();
    info!("Serving {} on port {}", dir.display(), port);

    server::serve(directory_router(&dir), &config.listen_addr(port)).await?;
    Ok(())
}
