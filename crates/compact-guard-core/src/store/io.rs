//! Atomic file replacement
//!
//! New content is written to a temporary file in the destination directory,
//! synced, then renamed over the target. Readers see either the previous file
//! or the complete new one, never a partial write.

use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::map_write_err;

/// Atomically replace `path` with `contents`
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    write_atomic_with(path, |w| w.write_all(contents.as_bytes()))
}

/// Atomically replace `path` with whatever `write` produces. If `write`
/// fails, the temporary file is removed and `path` is left untouched.
pub fn write_atomic_with<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::Builder::new()
        .prefix(".decisions-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| map_write_err!(path, e))?;

    write(&mut tmp).map_err(|e| map_write_err!(path, e))?;
    tmp.flush().map_err(|e| map_write_err!(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| map_write_err!(path, e))?;

    tmp.persist(path).map_err(|e| map_write_err!(path, e.error))?;
    tracing::debug!(path = %path.display(), "replaced file");
    Ok(())
}
