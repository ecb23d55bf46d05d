//! Cross-platform filesystem wrapper.
//!
//! The rest of the crate imports `crate::fsx::*` instead of touching `std::fs` directly, so
//! the few places where output files are created or reopened for positional writes live in
//! one module. Everything else is re-exported from `std::fs` unchanged.

use std::io;
use std::path::Path;

pub use std::fs::*;

/// Create (or truncate) `path` and size it to exactly `len` bytes, then close it.
/// Workers reopen the file with [`open_for_commit`].
pub fn preallocate(path: &Path, len: u64) -> io::Result<()> {
    let file = OpenOptions::new().write(true).create(true).truncate(true).open(path)?;
    file.set_len(len)?;
    file.sync_all()
}

/// Open an existing, pre-sized output for positional writes. Never creates or truncates.
pub fn open_for_commit(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).open(path)
}

/// `true` when both paths exist and name the same underlying file, including through
/// hardlinks and symlinks.
pub fn same_file(a: &Path, b: &Path) -> bool {
    ::same_file::is_same_file(a, b).unwrap_or(false)
}
