//! Mode-safe directory and file acquisition
//!
//! `std::fs::create_dir_all` happily accepts a pre-existing world-readable
//! directory when the caller asked for an owner-only one. The functions here
//! refuse that: an existing path is admitted only when its observed mode is
//! exactly the expected mode, and a missing path is created with that mode.
//!
//! Every decision is taken from a single stat of the path. The check is
//! TOCTOU-honest: a process that changes the path between the stat and the
//! open can still defeat it. [`open_file`] narrows the window by re-checking
//! the opened handle with `fstat` and by creating missing files exclusively.

use crate::error::{Error, Result};
use bitflags::bitflags;
use std::fmt;
use std::fs::{File, Metadata, OpenOptions};
use std::io;
use std::path::Path;
use tracing::debug;

/// File-type field of `st_mode`
const S_IFMT: u32 = 0o170000;

/// Permission, setuid, setgid and sticky bits
const PERMISSION_BITS: u32 = 0o7777;

const S_IFDIR: u32 = 0o040000;
const S_IFREG: u32 = 0o100000;

/// A filesystem mode word as returned by stat
///
/// A mode without file-type bits (`Mode::new(0o755)`) is compared against
/// everything stat reports except the file-type field, so setuid, setgid and
/// sticky bits still count. A mode that carries file-type bits
/// (`Mode::new(0o040755)`) must match the whole `st_mode` word.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mode(u32);

impl Mode {
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw mode word
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Bits accepted by chmod
    pub const fn permissions(self) -> u32 {
        self.0 & PERMISSION_BITS
    }

    pub const fn file_type(self) -> u32 {
        self.0 & S_IFMT
    }

    /// Observed mode of a stat result
    #[cfg(unix)]
    pub fn of(metadata: &Metadata) -> Self {
        use std::os::unix::fs::PermissionsExt;
        Self(metadata.permissions().mode())
    }

    #[cfg(not(unix))]
    pub fn of(metadata: &Metadata) -> Self {
        if metadata.permissions().readonly() {
            Self(0o444)
        } else {
            Self(0o666)
        }
    }

    /// Project an observed `st_mode` onto the bits this mode is compared over
    pub fn comparable(self, observed: Mode) -> Mode {
        if self.file_type() == 0 {
            Mode(observed.0 & !S_IFMT)
        } else {
            observed
        }
    }

    /// Exact comparison against an observed `st_mode`
    pub fn matches(self, observed: Mode) -> bool {
        self.comparable(observed) == self
    }
}

impl From<u32> for Mode {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#o}", self.0)
    }
}

impl fmt::Debug for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mode({:#o})", self.0)
    }
}

bitflags! {
    /// How [`open_file`] opens the path once the mode check passed
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpenFlags: u32 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const APPEND = 1 << 2;
        const TRUNCATE = 1 << 3;
        /// Create the file if it is missing
        const CREATE = 1 << 4;
        /// Create the file, failing if it already exists
        const CREATE_NEW = 1 << 5;
    }
}

impl OpenFlags {
    /// Whether these flags can bring a new file into existence
    pub fn creates(self) -> bool {
        self.intersects(Self::CREATE | Self::CREATE_NEW)
    }

    fn to_options(self, mode: Mode, exclusive: bool) -> OpenOptions {
        let writable = self.intersects(Self::WRITE | Self::APPEND);
        let create_new = exclusive || self.contains(Self::CREATE_NEW);
        let create = self.contains(Self::CREATE);
        let truncate = self.contains(Self::TRUNCATE);

        let mut options = OpenOptions::new();
        // Like O_RDONLY, no access flag at all means read
        options
            .read(self.contains(Self::READ) || !writable)
            .write(self.contains(Self::WRITE))
            .append(self.contains(Self::APPEND));

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;

            if writable {
                options.truncate(truncate);
                if create_new {
                    options.create_new(true);
                } else {
                    options.create(create);
                }
            } else {
                // OpenOptions refuses to create or truncate without write
                // access, the open(2) flags do not
                let mut raw = 0;
                if truncate {
                    raw |= libc::O_TRUNC;
                }
                if create_new {
                    raw |= libc::O_CREAT | libc::O_EXCL;
                } else if create {
                    raw |= libc::O_CREAT;
                }
                options.custom_flags(raw);
            }
            options.mode(mode.permissions());
        }

        #[cfg(not(unix))]
        {
            let _ = mode;
            options.truncate(truncate);
            if create_new {
                options.create_new(true);
            } else {
                options.create(create);
            }
        }

        options
    }
}

/// Ensure `path` is a directory whose mode is exactly `mode`
///
/// A missing directory is created together with any missing ancestors.
/// Ancestors get whatever the builder applies under the process umask; only
/// `path` itself is guaranteed to end up with `mode`. An existing path is
/// never modified.
pub fn ensure_directory(path: impl AsRef<Path>, mode: Mode) -> Result<()> {
    let path = path.as_ref();

    match std::fs::metadata(path) {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(Error::NotADirectory(path.to_path_buf()));
            }
            check_mode(path, &metadata, mode)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            check_creatable(path, mode, S_IFDIR, "directory")?;
            create_directory(path, mode)?;
            debug!("Created directory {} with mode {}", path.display(), mode);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Open `path` with `flags`, admitting an existing file only if its mode is `mode`
///
/// A file that exists with any other mode is rejected before it is opened.
/// A missing file is handed to the underlying open; when `flags` create it,
/// it is created exclusively and ends up with exactly `mode`. Without a
/// create flag the underlying not-found error is returned as is.
pub fn open_file(path: impl AsRef<Path>, flags: OpenFlags, mode: Mode) -> Result<File> {
    let path = path.as_ref();

    let existed = match std::fs::metadata(path) {
        Ok(metadata) => {
            check_mode(path, &metadata, mode)?;
            true
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(e.into()),
    };

    let create = !existed && flags.creates();
    if create {
        check_creatable(path, mode, S_IFREG, "regular file")?;
    }
    let file = flags.to_options(mode, create).open(path)?;

    if create {
        set_mode(&file, mode)?;
        debug!("Created file {} with mode {}", path.display(), mode);
    } else if existed {
        // Same check on the handle, in case the path changed after the stat
        check_mode(path, &file.metadata()?, mode)?;
    }

    Ok(file)
}

fn check_mode(path: &Path, metadata: &Metadata, expected: Mode) -> Result<()> {
    let observed = Mode::of(metadata);
    if expected.matches(observed) {
        Ok(())
    } else {
        Err(Error::ModeMismatch {
            path: path.to_path_buf(),
            observed: expected.comparable(observed),
            expected,
        })
    }
}

/// A mode with file-type bits can only be satisfied by a path of that type
fn check_creatable(path: &Path, mode: Mode, file_type: u32, kind: &'static str) -> Result<()> {
    if mode.file_type() == 0 || mode.file_type() == file_type {
        Ok(())
    } else {
        Err(Error::FileTypeMismatch {
            path: path.to_path_buf(),
            expected: mode,
            kind,
        })
    }
}

#[cfg(unix)]
fn create_directory(path: &Path, mode: Mode) -> io::Result<()> {
    use std::fs::{DirBuilder, Permissions};
    use std::os::unix::fs::{DirBuilderExt, PermissionsExt};

    DirBuilder::new()
        .recursive(true)
        .mode(mode.permissions())
        .create(path)?;
    // The builder mode is filtered through the umask
    std::fs::set_permissions(path, Permissions::from_mode(mode.permissions()))
}

#[cfg(not(unix))]
fn create_directory(path: &Path, _mode: Mode) -> io::Result<()> {
    std::fs::create_dir_all(path)
}

#[cfg(unix)]
fn set_mode(file: &File, mode: Mode) -> io::Result<()> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(Permissions::from_mode(mode.permissions()))
}

#[cfg(not(unix))]
fn set_mode(_file: &File, _mode: Mode) -> io::Result<()> {
    Ok(())
}
