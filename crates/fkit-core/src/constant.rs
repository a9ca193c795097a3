//! Default modes and platform helpers shared by gate callers

use crate::secure::Mode;

/// Mode for directories created by fkit tooling
pub const DEFAULT_DIR_MODE: Mode = Mode::new(0o755);

/// Mode for files holding secrets or generated state
pub const DEFAULT_FILE_MODE: Mode = Mode::new(0o600);

/// Mode for files other users on the host must be able to read
pub const DEFAULT_WORLD_READABLE_FILE_MODE: Mode = Mode::new(0o644);

/// Mode for installed executables
pub const DEFAULT_EXECUTABLE_MODE: Mode = Mode::new(0o755);

/// Filename extension used for executables on `platform`
///
/// Only `"windows"` has one; every other identifier maps to the empty string.
pub fn executable_extension(platform: &str) -> &'static str {
    match platform {
        "windows" => ".exe",
        _ => "",
    }
}
