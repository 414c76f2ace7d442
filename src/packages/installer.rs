//! Package installation
//!
//! Resolves the project, looks the package up in the store, unpacks it under
//! the project's `packages/` directory and runs its install manifest.
//! Nothing is written until the package lookup has succeeded.

use crate::error::{Error, Result};
use crate::packages::archive;
use crate::packages::interpreter::{Interpreter, StepFailure};
use crate::packages::manifest::InstallManifest;
use crate::packages::report::{InstallResult, StepReport};
use crate::packages::store::{PackageRecord, PackageStore};
use crate::project::{self, Project};
use crate::utils::fs::sha256_file;
use std::path::{Path, PathBuf};

/// Progress callbacks. All methods default to doing nothing.
pub trait Reporter {
    fn project_resolved(&mut self, _project: &Project) {}

    /// Called once the package is found, before anything is written.
    fn adding(&mut self, _record: &PackageRecord) {}

    fn unpacked(&mut self, _package_root: &Path, _files: &[PathBuf]) {}

    fn step_finished(&mut self, _report: &StepReport) {}
}

/// A reporter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

pub struct PackageInstaller<'s> {
    store: &'s dyn PackageStore,
}

impl<'s> PackageInstaller<'s> {
    pub fn new(store: &'s dyn PackageStore) -> Self {
        Self { store }
    }

    /// Install `name` into the project rooted at `project_cwd`.
    ///
    /// A failing manifest step yields [`Error::InstallAborted`] carrying the
    /// partial result; earlier steps stay applied.
    pub fn install(
        &self,
        project_cwd: &Path,
        name: &str,
        reporter: &mut dyn Reporter,
    ) -> Result<InstallResult> {
        let project = project::resolve(project_cwd)?;
        reporter.project_resolved(&project);
        self.install_into(&project, name, reporter)
    }

    /// Install `name` into an already resolved project.
    pub fn install_into(
        &self,
        project: &Project,
        name: &str,
        reporter: &mut dyn Reporter,
    ) -> Result<InstallResult> {
        let record = self
            .store
            .lookup(name)?
            .ok_or_else(|| Error::PackageNotFound {
                name: name.to_string(),
            })?;
        // Name and version become a directory under packages/
        record.check_paths()?;
        reporter.adding(&record);

        verify_checksum(&record)?;

        std::fs::create_dir_all(&project.packages_dir).map_err(|e| {
            Error::DestinationNotWritable {
                path: project.packages_dir.clone(),
                source: e,
            }
        })?;

        let package_root = project.packages_dir.join(record.unpack_dir_name());
        let mut result = InstallResult::new(&record.name, &record.version, package_root.clone());

        result.unpacked = archive::unpack(&record.archive_path, &package_root)?;
        reporter.unpacked(&package_root, &result.unpacked);

        let manifest = InstallManifest::load(&package_root.join(&record.manifest_path))?;
        tracing::debug!(
            "Applying {} step(s) from {} {}",
            manifest.steps.len(),
            record.name,
            record.version
        );

        let applied = Interpreter::new(project, &package_root)
            .apply_with(&manifest, |report| reporter.step_finished(report));

        match applied {
            Ok(steps) => {
                result.steps = steps;
                tracing::info!(
                    "Installed {} {} ({} file(s) written)",
                    record.name,
                    record.version,
                    result.written_files().len()
                );
                Ok(result)
            }
            Err(StepFailure {
                index,
                kind,
                error,
                steps,
            }) => {
                result.steps = steps;
                Err(Error::InstallAborted {
                    step: index,
                    kind,
                    source: Box::new(error),
                    partial: Box::new(result),
                })
            }
        }
    }
}

/// Install `name` from `store` into the project at `project_cwd`.
pub fn install(
    project_cwd: &Path,
    name: &str,
    store: &dyn PackageStore,
    reporter: &mut dyn Reporter,
) -> Result<InstallResult> {
    PackageInstaller::new(store).install(project_cwd, name, reporter)
}

fn verify_checksum(record: &PackageRecord) -> Result<()> {
    let Some(expected) = &record.checksum else {
        return Ok(());
    };
    let actual = sha256_file(&record.archive_path)?;
    if actual != *expected {
        return Err(Error::ChecksumMismatch {
            path: record.archive_path.clone(),
            expected: expected.clone(),
            actual,
        });
    }
    Ok(())
}
