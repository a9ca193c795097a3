//! Serves a locally packaged browser extension on the loopback interface

use fkit_tools::{logging, routes::extension_router, server, ToolsConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let runtime = server::build_runtime("fkit-extension")?;
    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    logging::init();

    let config = ToolsConfig::from_env();
    info!(
        "Serving extension files from {}",
        config.extension_root.display()
    );

    let app = extension_router(&config.extension_root);
    server::serve(app, &config.extension_addr).await?;
    Ok(())
}
