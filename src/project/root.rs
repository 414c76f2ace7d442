//! Project layout resolution
//!
//! Classifies the directory the tool runs in:
//! 1. `Classes/` at the root - native (C++) project
//! 2. `frameworks/runtime-src/Classes/` - scripted (Lua/JS) project
//!
//! Unlike package lookup there is no walking up: installation must run at
//! the project root, because every install path is relative to it.

use super::{Platform, Project, ProjectKind, PACKAGES_DIRNAME};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Kinds in detection order. The first whose classes dir exists wins.
const DETECTION_ORDER: &[ProjectKind] = &[ProjectKind::Native, ProjectKind::Scripted];

/// Resolve the project rooted at `cwd`.
///
/// Fails with [`Error::ProjectKindUnresolved`] if neither source directory
/// layout is present. Platforms whose `proj.*` directory is missing are
/// left out of `platform_roots`; that is not an error.
///
/// # Examples
/// ```ignore
/// let project = pkgwire::project::resolve(&std::env::current_dir()?)?;
/// println!("{} ({})", project.path.display(), project.kind);
/// ```
pub fn resolve(cwd: &Path) -> Result<Project> {
    let path = cwd.canonicalize().map_err(|e| Error::file(cwd, e))?;

    let kind = detect_kind(&path).ok_or_else(|| Error::ProjectKindUnresolved {
        path: path.clone(),
    })?;

    let prefix = path.join(kind.prefix());
    let mut platform_roots = BTreeMap::new();
    for platform in Platform::ALL {
        let root = prefix.join(platform.dir_name());
        if root.is_dir() {
            platform_roots.insert(platform, root);
        }
    }

    tracing::debug!(
        "Resolved {} project at {} (platforms: {:?})",
        kind,
        path.display(),
        platform_roots.keys().collect::<Vec<_>>()
    );

    Ok(Project {
        packages_dir: path.join(PACKAGES_DIRNAME),
        classes_dir: kind.classes_dir(),
        kind,
        platform_roots,
        path,
    })
}

fn detect_kind(root: &Path) -> Option<ProjectKind> {
    DETECTION_ORDER
        .iter()
        .copied()
        .find(|kind| root.join(kind.classes_dir()).is_dir())
}
