//! Outcome of an install, per step

use crate::project::Platform;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Files were created or modified
    Applied { written: Vec<PathBuf> },
    /// The step's effect was already in place
    Unchanged,
    /// The step targets a platform the project does not have
    Skipped { platform: Platform },
    Failed { error: String },
    /// An earlier step failed
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// 1-based position in the manifest
    pub index: usize,
    pub kind: &'static str,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallResult {
    pub package: String,
    pub version: String,
    /// Directory the package was unpacked into
    pub package_root: PathBuf,
    /// Files extracted from the archive
    pub unpacked: Vec<PathBuf>,
    pub steps: Vec<StepReport>,
}

impl InstallResult {
    pub fn new(package: &str, version: &str, package_root: PathBuf) -> Self {
        Self {
            package: package.to_string(),
            version: version.to_string(),
            package_root,
            unpacked: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed_step().is_none()
    }

    pub fn failed_step(&self) -> Option<&StepReport> {
        self.steps
            .iter()
            .find(|s| matches!(s.outcome, StepOutcome::Failed { .. }))
    }

    /// Project files created or modified by the manifest steps, sorted.
    pub fn written_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .steps
            .iter()
            .filter_map(|s| match &s.outcome {
                StepOutcome::Applied { written } => Some(written),
                _ => None,
            })
            .flatten()
            .cloned()
            .collect();
        files.sort();
        files.dedup();
        files
    }
}
