//! Working-directory resolution for commands
//!
//! Project keys hash the path string, so the path is made absolute but
//! otherwise left as given: symlinks are not resolved, matching the way the
//! host reports its working directory.

use std::env;
use std::path::Path;

use compact_guard_core::error::Result;

/// Resolve the project working directory for a command.
///
/// An explicit relative directory is joined onto the current directory;
/// without one, the current directory is used.
pub fn resolve_cwd(cwd: Option<&Path>) -> Result<String> {
    let path = match cwd {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => env::current_dir()?.join(dir),
        None => env::current_dir()?,
    };
    Ok(path.to_string_lossy().into_owned())
}
