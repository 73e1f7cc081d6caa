//! Crash-safe file writes for `.rainsale/` records and HTML pages.

use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::trace;

/// Replace `path` with `data` in one rename. The bytes land in a sibling temp
/// file first, so a reader sees either the previous page or record, or the
/// new one.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(data)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;
    trace!(path = %path.display(), bytes = data.len(), "file replaced");
    Ok(())
}

/// Create `path` with `data` unless a file is already there, so a
/// hand-edited config survives a second `rainsale init`. Returns whether the
/// file was created.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, data).map(|()| true)
}
