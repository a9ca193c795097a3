//! Applies one regex replacement to a file in place
//!
//! Usage: fkit-rewrite <file> <pattern> <replacement>

use anyhow::bail;
use fkit_tools::{logging, rewrite::rewrite_file};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [file, pattern, replacement] => {
            rewrite_file(Path::new(file), pattern, replacement)?;
            Ok(())
        }
        _ => bail!("usage: fkit-rewrite <file> <pattern> <replacement>"),
    }
}
