//! Output types for CLI commands
//!
//! Each command builds one of these and serializes it for `--format json`.

use crate::packages::report::{InstallResult, StepReport};
use crate::packages::store::PackageRecord;
use crate::project::Project;
use serde::Serialize;
use std::path::PathBuf;

/// Trait for command outputs that can be serialized to JSON
pub trait CommandOutput: Serialize {
    /// Serialize to pretty-printed JSON string
    fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// =============================================================================
// AddOutput
// =============================================================================

/// Output for `pkgwire add`
#[derive(Debug, Serialize)]
pub struct AddOutput {
    /// "success" or "error"
    pub status: String,
    pub package: String,
    pub version: String,
    pub package_root: PathBuf,
    /// Number of files extracted from the archive
    pub unpacked: usize,
    /// Project files created or modified
    pub written: Vec<PathBuf>,
    pub steps: Vec<StepReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AddOutput {
    pub fn from_result(result: &InstallResult, error: Option<String>) -> Self {
        Self {
            status: if error.is_none() { "success" } else { "error" }.to_string(),
            package: result.package.clone(),
            version: result.version.clone(),
            package_root: result.package_root.clone(),
            unpacked: result.unpacked.len(),
            written: result.written_files(),
            steps: result.steps.clone(),
            error,
        }
    }
}

impl CommandOutput for AddOutput {}

/// Output for a command that failed before producing a result
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    /// Always "error"
    pub status: String,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    pub error: String,
    pub exit_code: i32,
}

impl ErrorOutput {
    pub fn new(command: &str, package: Option<&str>, error: String, exit_code: i32) -> Self {
        Self {
            status: "error".to_string(),
            command: command.to_string(),
            package: package.map(str::to_string),
            error,
            exit_code,
        }
    }
}

impl CommandOutput for ErrorOutput {}

// =============================================================================
// ProjectOutput
// =============================================================================

/// Output for `pkgwire project`
#[derive(Debug, Serialize)]
pub struct ProjectOutput {
    pub path: PathBuf,
    /// "cpp" or "script"
    pub kind: String,
    pub classes_dir: PathBuf,
    pub packages_dir: PathBuf,
    pub platforms: Vec<String>,
}

impl From<&Project> for ProjectOutput {
    fn from(project: &Project) -> Self {
        Self {
            path: project.path.clone(),
            kind: project.kind.to_string(),
            classes_dir: project.classes_path(),
            packages_dir: project.packages_dir.clone(),
            platforms: project.platforms().map(|p| p.to_string()).collect(),
        }
    }
}

impl CommandOutput for ProjectOutput {}

// =============================================================================
// ListOutput
// =============================================================================

/// Package info for list output
#[derive(Debug, Serialize)]
pub struct ListPackageInfo {
    pub name: String,
    pub version: String,
    pub author: String,
    pub archive: PathBuf,
}

impl From<&PackageRecord> for ListPackageInfo {
    fn from(record: &PackageRecord) -> Self {
        Self {
            name: record.name.clone(),
            version: record.version.clone(),
            author: record.author.clone(),
            archive: record.archive_path.clone(),
        }
    }
}

/// Output for `pkgwire list`
#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub store: PathBuf,
    pub packages: Vec<ListPackageInfo>,
    pub count: usize,
}

impl CommandOutput for ListOutput {}
