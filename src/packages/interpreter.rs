//! Applies an install manifest to a resolved project
//!
//! Steps run strictly in manifest order and stop at the first failure.
//! Every step is idempotent on its own: copies compare contents before
//! writing, and text edits go through [`crate::packages::patch`].

use crate::error::{Error, Result};
use crate::packages::manifest::{InstallManifest, InstallStep};
use crate::packages::patch::{self, MatchMode, PatchOutcome};
use crate::packages::report::{StepOutcome, StepReport};
use crate::project::{DescriptorLocation, Platform, Project};
use crate::utils::fs::{copy_atomic, read_text, write_atomic};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A manifest run that stopped at a failing step.
#[derive(Debug)]
pub struct StepFailure {
    /// 1-based index of the failing step
    pub index: usize,
    pub kind: &'static str,
    pub error: Error,
    /// Reports for every step, including the failed and not-attempted ones
    pub steps: Vec<StepReport>,
}

pub struct Interpreter<'a> {
    project: &'a Project,
    package_root: &'a Path,
}

impl<'a> Interpreter<'a> {
    pub fn new(project: &'a Project, package_root: &'a Path) -> Self {
        Self {
            project,
            package_root,
        }
    }

    /// Run every step in order.
    pub fn apply(&self, manifest: &InstallManifest) -> std::result::Result<Vec<StepReport>, StepFailure> {
        self.apply_with(manifest, |_| {})
    }

    /// Run every step in order, calling `observe` as each one finishes.
    pub fn apply_with(
        &self,
        manifest: &InstallManifest,
        mut observe: impl FnMut(&StepReport),
    ) -> std::result::Result<Vec<StepReport>, StepFailure> {
        let total = manifest.steps.len();
        let mut reports = Vec::with_capacity(total);

        for (i, step) in manifest.steps.iter().enumerate() {
            let index = i + 1;
            tracing::debug!("Step {}/{}: {}", index, total, step.kind());

            match self.run_step(step) {
                Ok(outcome) => {
                    let report = StepReport {
                        index,
                        kind: step.kind(),
                        outcome,
                    };
                    observe(&report);
                    reports.push(report);
                }
                Err(error) => {
                    tracing::debug!("Step {} ({}) failed: {}", index, step.kind(), error);
                    let report = StepReport {
                        index,
                        kind: step.kind(),
                        outcome: StepOutcome::Failed {
                            error: error.to_string(),
                        },
                    };
                    observe(&report);
                    reports.push(report);

                    for (j, rest) in manifest.steps.iter().enumerate().skip(index) {
                        reports.push(StepReport {
                            index: j + 1,
                            kind: rest.kind(),
                            outcome: StepOutcome::NotAttempted,
                        });
                    }

                    return Err(StepFailure {
                        index,
                        kind: step.kind(),
                        error,
                        steps: reports,
                    });
                }
            }
        }

        Ok(reports)
    }

    /// Run a single step.
    pub fn run_step(&self, step: &InstallStep) -> Result<StepOutcome> {
        // Steps aimed at a platform the project doesn't build are skipped
        let platform_root = match step.platform() {
            Some(platform) => match self.project.platform_root(platform) {
                Some(root) => Some((platform, root)),
                None => {
                    tracing::info!("Skipping {} step: no {} in project", step.kind(), platform.dir_name());
                    return Ok(StepOutcome::Skipped { platform });
                }
            },
            None => None,
        };

        match step {
            InstallStep::CopyFile { src, dst, .. } => {
                let base = self.destination_base(platform_root);
                self.copy_file(&self.package_root.join(src), &base.join(dst))
            }
            InstallStep::CopyDir { src, dst, .. } => {
                let base = self.destination_base(platform_root);
                self.copy_dir(&self.package_root.join(src), &base.join(dst))
            }
            InstallStep::PatchBuildDescriptor {
                anchor,
                insertion,
                descriptor,
                platform,
            } => {
                let root = match platform_root {
                    Some((_, root)) => root,
                    None => return Ok(StepOutcome::Skipped { platform: *platform }),
                };
                let path = locate_descriptor(*platform, root, descriptor.as_deref())?;
                patch_descriptor(*platform, &path, anchor, insertion)
            }
            InstallStep::TextSubstitute {
                file,
                pattern,
                replacement,
                regex,
                ..
            } => {
                let base = platform_root
                    .map(|(_, root)| root)
                    .unwrap_or(self.project.path.as_path());
                let mode = if *regex { MatchMode::Regex } else { MatchMode::Literal };
                text_substitute(&base.join(file), pattern, replacement, mode)
            }
        }
    }

    fn destination_base(&self, platform_root: Option<(Platform, &Path)>) -> PathBuf {
        match platform_root {
            Some((_, root)) => root.to_path_buf(),
            None => self.project.classes_path(),
        }
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> Result<StepOutcome> {
        if !src.is_file() {
            return Err(missing_source(src));
        }
        if same_contents(src, dst)? {
            tracing::debug!("{} is up to date", dst.display());
            return Ok(StepOutcome::Unchanged);
        }
        copy_atomic(src, dst)?;
        Ok(StepOutcome::Applied {
            written: vec![dst.to_path_buf()],
        })
    }

    fn copy_dir(&self, src: &Path, dst: &Path) -> Result<StepOutcome> {
        if !src.is_dir() {
            return Err(missing_source(src));
        }

        let mut written = Vec::new();
        for entry in WalkDir::new(src).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(src).to_path_buf();
                Error::file(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
            let target = dst.join(relative);
            if same_contents(entry.path(), &target)? {
                continue;
            }
            copy_atomic(entry.path(), &target)?;
            written.push(target);
        }

        if written.is_empty() {
            Ok(StepOutcome::Unchanged)
        } else {
            Ok(StepOutcome::Applied { written })
        }
    }
}

/// Locate the build descriptor of `platform` under its root.
///
/// An explicit `descriptor` path (relative to the root) overrides the
/// platform's standard location. Directory scans pick the first match by
/// name so the choice is stable.
pub fn locate_descriptor(platform: Platform, root: &Path, descriptor: Option<&Path>) -> Result<PathBuf> {
    let not_found = |path: PathBuf| Error::DescriptorNotFound { platform, path };

    if let Some(relative) = descriptor {
        let path = root.join(relative);
        return if path.is_file() { Ok(path) } else { Err(not_found(path)) };
    }

    match platform.descriptor() {
        DescriptorLocation::Fixed(relative) => {
            let path = root.join(relative);
            if path.is_file() {
                Ok(path)
            } else {
                Err(not_found(path))
            }
        }
        DescriptorLocation::FileWithExtension(ext) => first_with_extension(root, ext, false)
            .ok_or_else(|| not_found(root.join(format!("*.{}", ext)))),
        DescriptorLocation::InsideDirWithExtension(ext, name) => first_with_extension(root, ext, true)
            .map(|dir| dir.join(name))
            .filter(|path| path.is_file())
            .ok_or_else(|| not_found(root.join(format!("*.{}", ext)).join(name))),
    }
}

fn first_with_extension(dir: &Path, ext: &str, want_dir: bool) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|e| e == ext))
        .filter(|path| if want_dir { path.is_dir() } else { path.is_file() })
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

fn patch_descriptor(platform: Platform, path: &Path, anchor: &str, insertion: &str) -> Result<StepOutcome> {
    let content = read_text(path)?;
    match patch::insert_after_anchor(&content, anchor, insertion) {
        Ok(PatchOutcome::Changed(patched)) => {
            write_atomic(path, patched.as_bytes())?;
            Ok(StepOutcome::Applied {
                written: vec![path.to_path_buf()],
            })
        }
        Ok(PatchOutcome::Unchanged) => {
            tracing::debug!("{} already contains the insertion", path.display());
            Ok(StepOutcome::Unchanged)
        }
        Err(patch::NotFound) => Err(Error::AnchorNotFound {
            platform,
            path: path.to_path_buf(),
            anchor: anchor.to_string(),
        }),
    }
}

fn text_substitute(path: &Path, pattern: &str, replacement: &str, mode: MatchMode) -> Result<StepOutcome> {
    let content = read_text(path)?;
    match patch::substitute(&content, pattern, replacement, mode) {
        Ok(PatchOutcome::Changed(patched)) => {
            write_atomic(path, patched.as_bytes())?;
            Ok(StepOutcome::Applied {
                written: vec![path.to_path_buf()],
            })
        }
        Ok(PatchOutcome::Unchanged) => Ok(StepOutcome::Unchanged),
        Err(patch::NotFound) => Err(Error::PatternNotFound {
            path: path.to_path_buf(),
            pattern: pattern.to_string(),
        }),
    }
}

fn same_contents(src: &Path, dst: &Path) -> Result<bool> {
    if !dst.is_file() {
        return Ok(false);
    }
    let src_meta = fs::metadata(src).map_err(|e| Error::file(src, e))?;
    let dst_meta = fs::metadata(dst).map_err(|e| Error::file(dst, e))?;
    if src_meta.len() != dst_meta.len() {
        return Ok(false);
    }
    let a = fs::read(src).map_err(|e| Error::file(src, e))?;
    let b = fs::read(dst).map_err(|e| Error::file(dst, e))?;
    Ok(a == b)
}

fn missing_source(src: &Path) -> Error {
    Error::file(
        src,
        std::io::Error::new(std::io::ErrorKind::NotFound, "not found in package"),
    )
}
