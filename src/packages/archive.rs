//! Package archive extraction
//!
//! Packages ship as zip archives. Extraction keeps relative paths, overwrites
//! files left by an earlier install, and refuses archives with entries that
//! would land outside the destination.

use crate::error::{Error, Result};
use crate::utils::fs::write_atomic_mode;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use zip::ZipArchive;

/// Upper bound on buffer space reserved up front for one entry.
const PREALLOC_LIMIT: u64 = 1 << 20;

/// An archive entry that passed validation.
#[derive(Debug)]
struct PlannedEntry {
    index: usize,
    relative_path: PathBuf,
    is_dir: bool,
    mode: Option<u32>,
}

/// Extract `archive_path` into `dest_dir`.
///
/// Every entry name is validated before anything is written, so a hostile
/// entry cannot leave files behind. Returns the absolute paths of the files
/// written, sorted.
pub fn unpack(archive_path: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(archive_path).map_err(|e| Error::file(archive_path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| corrupt(archive_path, e))?;

    let plan = plan_entries(&mut archive, archive_path)?;

    fs::create_dir_all(dest_dir).map_err(|e| Error::DestinationNotWritable {
        path: dest_dir.to_path_buf(),
        source: e,
    })?;

    let mut written = Vec::new();
    for entry in plan {
        let target = dest_dir.join(&entry.relative_path);

        if entry.is_dir {
            fs::create_dir_all(&target).map_err(|e| Error::DestinationNotWritable {
                path: target.clone(),
                source: e,
            })?;
            continue;
        }

        let mut zipped = archive
            .by_index(entry.index)
            .map_err(|e| corrupt(archive_path, e))?;
        // Declared sizes come from the archive and are not trusted
        let mut contents = Vec::with_capacity(zipped.size().min(PREALLOC_LIMIT) as usize);
        zipped
            .read_to_end(&mut contents)
            .map_err(|e| corrupt(archive_path, e))?;

        write_atomic_mode(&target, &contents, entry.mode).map_err(not_writable)?;
        written.push(target);
    }

    written.sort();
    written.dedup();
    tracing::debug!(
        "Unpacked {} file(s) from {} into {}",
        written.len(),
        archive_path.display(),
        dest_dir.display()
    );
    Ok(written)
}

fn plan_entries(archive: &mut ZipArchive<File>, archive_path: &Path) -> Result<Vec<PlannedEntry>> {
    let mut plan = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let entry = archive
            .by_index_raw(index)
            .map_err(|e| corrupt(archive_path, e))?;
        let name = entry.name().to_string();

        let relative_path = safe_relative_path(&name).ok_or_else(|| Error::ArchiveCorrupt {
            path: archive_path.to_path_buf(),
            reason: format!("entry '{}' escapes the destination directory", name),
        })?;

        let is_dir = entry.is_dir();
        if relative_path.as_os_str().is_empty() {
            if is_dir {
                continue;
            }
            return Err(Error::ArchiveCorrupt {
                path: archive_path.to_path_buf(),
                reason: format!("entry '{}' has no file name", name),
            });
        }

        plan.push(PlannedEntry {
            index,
            relative_path,
            is_dir,
            mode: entry.unix_mode().map(|m| m & 0o777).filter(|m| *m != 0),
        });
    }

    Ok(plan)
}

/// Validate an archive entry name and turn it into a relative path.
///
/// Returns `None` for absolute names, drive prefixes, and any `..`
/// component. Backslashes are treated as separators.
pub fn safe_relative_path(name: &str) -> Option<PathBuf> {
    let normalized = name.replace('\\', "/");
    if normalized.starts_with('/') {
        return None;
    }

    let mut path = PathBuf::new();
    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(part) => {
                // Reject Windows drive letters like "C:" that Unix parses as normal
                if part.to_string_lossy().contains(':') {
                    return None;
                }
                path.push(part);
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(path)
}

fn corrupt(archive_path: &Path, err: impl std::fmt::Display) -> Error {
    Error::ArchiveCorrupt {
        path: archive_path.to_path_buf(),
        reason: err.to_string(),
    }
}

fn not_writable(err: Error) -> Error {
    match err {
        Error::FileIo { path, source } => Error::DestinationNotWritable { path, source },
        other => other,
    }
}
