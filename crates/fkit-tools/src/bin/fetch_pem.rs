//! Prints the certificate chain a TLS server presents
//!
//! Usage: fkit-fetch-pem <host[:port]>

use anyhow::bail;
use fkit_tools::{logging, pki, ToolsConfig};
use std::io::Write;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let target = match args.as_slice() {
        [target] => target,
        _ => bail!("usage: fkit-fetch-pem <host[:port]>"),
    };

    let config = ToolsConfig::from_env();
    let pem = pki::fetch_pem(target, config.connect_timeout).await?;

    std::io::stdout().write_all(pem.as_bytes())?;
    Ok(())
}
