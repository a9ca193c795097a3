//! Emits the extension table schema as SQL or JSON
//!
//! Usage: fkit-gen-schema <sql|json> [out]

use anyhow::bail;
use fkit_tools::{logging, schema};
use std::io::Write;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (format, out) = match args.as_slice() {
        [format] => (format, None),
        [format, out] => (format, Some(Path::new(out))),
        _ => bail!("usage: fkit-gen-schema <sql|json> [out]"),
    };

    let rendered = schema::render(schema::tables(), format.parse()?)?;

    match out {
        Some(path) => schema::write_output(path, &rendered)?,
        None => std::io::stdout().write_all(rendered.as_bytes())?,
    }
    Ok(())
}
