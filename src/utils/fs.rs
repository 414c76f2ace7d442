//! File writes that never leave a truncated target behind
//!
//! Every mutation of a project or package file goes through [`write_atomic`]:
//! the new content is written to a temporary file in the target's directory
//! and then renamed over the target.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[cfg(unix)]
const DEFAULT_MODE: u32 = 0o644;

/// Atomically replace `path` with `contents`.
///
/// Creates missing parent directories. An existing target keeps its
/// permissions; a new one gets the default file mode.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let existing = fs::metadata(path).ok().map(|m| m.permissions());
    write_atomic_with(path, contents, existing)
}

/// Atomically replace `path` with `contents`, applying a Unix mode if given.
pub fn write_atomic_mode(path: &Path, contents: &[u8], mode: Option<u32>) -> Result<()> {
    match mode {
        #[cfg(unix)]
        Some(mode) => {
            use std::os::unix::fs::PermissionsExt;
            write_atomic_with(path, contents, Some(fs::Permissions::from_mode(mode)))
        }
        _ => write_atomic(path, contents),
    }
}

fn write_atomic_with(
    path: &Path,
    contents: &[u8],
    permissions: Option<fs::Permissions>,
) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| Error::file(parent, e))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| Error::file(parent, e))?;
    if let Err(e) = temp.write_all(contents).and_then(|_| temp.flush()) {
        return Err(Error::file(temp.path(), e));
    }

    let applied = match permissions {
        Some(perms) => fs::set_permissions(temp.path(), perms),
        None => set_default_permissions(temp.path()),
    };
    applied.map_err(|e| Error::file(temp.path(), e))?;

    temp.persist(path).map_err(|e| Error::file(path, e.error))?;
    Ok(())
}

#[cfg(unix)]
fn set_default_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(DEFAULT_MODE))
}

#[cfg(not(unix))]
fn set_default_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Copy a single file through [`write_atomic`], keeping the source's permissions.
pub fn copy_atomic(src: &Path, dst: &Path) -> Result<()> {
    let contents = fs::read(src).map_err(|e| Error::file(src, e))?;
    let perms = fs::metadata(src)
        .map_err(|e| Error::file(src, e))?
        .permissions();
    write_atomic_with(dst, &contents, Some(perms))
}

/// Read a UTF-8 text file with the path attached to any error.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::file(path, e))
}

/// Lowercase hex SHA-256 of a file's contents.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path).map_err(|e| Error::file(path, e))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(|e| Error::file(path, e))?;
    Ok(format!("{:x}", hasher.finalize()))
}
