use std::path::PathBuf;
use thiserror::Error;

use crate::secure::Mode;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}: mode {observed} does not match expected mode {expected}", path.display())]
    ModeMismatch {
        path: PathBuf,
        observed: Mode,
        expected: Mode,
    },

    #[error("{}: exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("{}: cannot create a {kind} with mode {expected}", path.display())]
    FileTypeMismatch {
        path: PathBuf,
        expected: Mode,
        kind: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the path was found with permissions other than the requested ones
    pub fn is_mode_mismatch(&self) -> bool {
        matches!(self, Self::ModeMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
