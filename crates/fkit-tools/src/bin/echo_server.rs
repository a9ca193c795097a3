//! Echoes every request back as the response body

use fkit_tools::{logging, routes::echo_router, server, ToolsConfig};

fn main() -> anyhow::Result<()> {
    let runtime = server::build_runtime("fkit-echo")?;
    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    logging::init();

    let config = ToolsConfig::from_env();
    let app = echo_router(config.max_body_size);

    server::serve(app, &config.listen_addr(config.echo_port)).await?;
    Ok(())
}
