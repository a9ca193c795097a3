//! In-place regex rewriting of a single file

use crate::error::Result;
use fkit_core::{open_file, Mode, OpenFlags};
use regex::bytes::Regex;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Turn a trailing literal `\n` in `replacement` into a newline
fn expand_replacement(replacement: &str) -> String {
    match replacement.strip_suffix("\\n") {
        Some(head) => format!("{}\n", head),
        None => replacement.to_string(),
    }
}

/// Replace every match of `pattern` in `contents`
///
/// Matching runs over raw bytes, so files that are not valid UTF-8 are
/// rewritten as well.
pub fn rewrite_bytes(contents: &[u8], pattern: &str, replacement: &str) -> Result<Vec<u8>> {
    let regex = Regex::new(pattern)?;
    let replacement = expand_replacement(replacement);
    Ok(regex
        .replace_all(contents, replacement.as_bytes())
        .into_owned())
}

/// Apply one regex replacement over the whole of `path`
///
/// The file is written back through the mode gate with the mode it had when
/// read, so a file whose mode changed in between is left alone. Returns
/// whether the contents changed.
pub fn rewrite_file(path: &Path, pattern: &str, replacement: &str) -> Result<bool> {
    let metadata = fs::metadata(path)?;
    let mode = Mode::of(&metadata);
    let contents = fs::read(path)?;

    let rewritten = rewrite_bytes(&contents, pattern, replacement)?;
    if rewritten == contents {
        info!("No match for {} in {}", pattern, path.display());
        return Ok(false);
    }

    let mut file = open_file(path, OpenFlags::WRITE | OpenFlags::TRUNCATE, mode)?;
    file.write_all(&rewritten)?;
    file.sync_all()?;

    info!("Rewrote {}", path.display());
    Ok(true)
}
