//! fkit core - mode-safe filesystem acquisition and shared constants
//!
//! The [`secure`] gate hands out directories and files only when their
//! on-disk mode is exactly the mode the caller asked for, creating them with
//! that mode when they are missing.

pub mod constant;
pub mod error;
pub mod secure;

pub use error::{Error, Result};
pub use secure::{ensure_directory, open_file, Mode, OpenFlags};
