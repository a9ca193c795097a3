//! Dumps a PEM certificate as JSON
//!
//! Usage: fkit-inspect-pem [file]
//!
//! Without a file the embedded root certificate is dumped.

use anyhow::{bail, Context};
use fkit_tools::{logging, pki};

fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let summary = match args.as_slice() {
        [] => pki::RootCertificate::embedded().summary().clone(),
        [path] => {
            let input = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path))?;
            pki::inspect_pem(&input)?
        }
        _ => bail!("usage: fkit-inspect-pem [file]"),
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
