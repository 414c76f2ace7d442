//! Install manifest (`install.json`) parsing and validation
//!
//! A manifest is an ordered list of typed steps:
//!
//! ```json
//! {
//!   "format": 1,
//!   "steps": [
//!     { "type": "copy-file", "src": "src/Foo.cpp", "dst": "Foo.cpp" },
//!     { "type": "patch-build-descriptor", "platform": "android",
//!       "anchor": "LOCAL_SRC_FILES := $(LOCAL_SRC_FILES)",
//!       "insertion": "LOCAL_SRC_FILES += Foo.cpp" }
//!   ]
//! }
//! ```
//!
//! The whole manifest is validated before any step runs, so a typo in step 5
//! never leaves steps 1-4 applied.

use crate::error::{Error, Result};
use crate::packages::archive::safe_relative_path;
use crate::project::Platform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Manifest format version understood by this build.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InstallManifest {
    #[serde(default = "default_format")]
    pub format: u32,
    pub steps: Vec<InstallStep>,
}

fn default_format() -> u32 {
    FORMAT_VERSION
}

/// One install step.
///
/// Source paths are relative to the unpacked package root. Destinations are
/// relative to the project's classes dir, or to a platform root when
/// `platform` is given (the step is skipped if the project lacks it).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InstallStep {
    CopyFile {
        src: PathBuf,
        dst: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        platform: Option<Platform>,
    },
    CopyDir {
        src: PathBuf,
        dst: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        platform: Option<Platform>,
    },
    PatchBuildDescriptor {
        platform: Platform,
        anchor: String,
        insertion: String,
        /// Overrides the platform's standard descriptor, relative to its root
        #[serde(default, skip_serializing_if = "Option::is_none")]
        descriptor: Option<PathBuf>,
    },
    TextSubstitute {
        /// Relative to the project root, or the platform root if `platform` is set
        file: PathBuf,
        pattern: String,
        replacement: String,
        #[serde(default)]
        regex: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        platform: Option<Platform>,
    },
}

impl InstallStep {
    pub fn kind(&self) -> &'static str {
        match self {
            InstallStep::CopyFile { .. } => "copy-file",
            InstallStep::CopyDir { .. } => "copy-dir",
            InstallStep::PatchBuildDescriptor { .. } => "patch-build-descriptor",
            InstallStep::TextSubstitute { .. } => "text-substitute",
        }
    }

    /// Platform the step is restricted to, if any.
    pub fn platform(&self) -> Option<Platform> {
        match self {
            InstallStep::CopyFile { platform, .. }
            | InstallStep::CopyDir { platform, .. }
            | InstallStep::TextSubstitute { platform, .. } => *platform,
            InstallStep::PatchBuildDescriptor { platform, .. } => Some(*platform),
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        match self {
            InstallStep::CopyFile { src, dst, .. } | InstallStep::CopyDir { src, dst, .. } => {
                check_relative("src", src)?;
                check_relative("dst", dst)
            }
            InstallStep::PatchBuildDescriptor {
                anchor,
                insertion,
                descriptor,
                ..
            } => {
                check_not_blank("anchor", anchor)?;
                check_not_blank("insertion", insertion)?;
                match descriptor {
                    Some(d) => check_relative("descriptor", d),
                    None => Ok(()),
                }
            }
            InstallStep::TextSubstitute {
                file,
                pattern,
                replacement,
                regex,
                ..
            } => {
                check_relative("file", file)?;
                check_not_blank("pattern", pattern)?;
                check_not_blank("replacement", replacement)?;
                if *regex {
                    regex::Regex::new(pattern).map_err(|e| format!("invalid regex: {}", e))?;
                }
                Ok(())
            }
        }
    }
}

impl InstallManifest {
    /// Parse and validate manifest text. `path` is only used in errors.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let invalid = |reason: String| Error::ManifestInvalid {
            path: path.to_path_buf(),
            reason,
        };

        let manifest: InstallManifest =
            serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;

        if manifest.format != FORMAT_VERSION {
            return Err(invalid(format!(
                "unsupported format {} (expected {})",
                manifest.format, FORMAT_VERSION
            )));
        }

        for (i, step) in manifest.steps.iter().enumerate() {
            step.validate()
                .map_err(|reason| invalid(format!("step {} ({}): {}", i + 1, step.kind(), reason)))?;
        }

        Ok(manifest)
    }

    /// Read, parse and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::ManifestInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&content, path)
    }
}

fn check_relative(field: &str, path: &Path) -> std::result::Result<(), String> {
    let text = path.to_string_lossy();
    match safe_relative_path(&text) {
        Some(p) if !p.as_os_str().is_empty() => Ok(()),
        _ => Err(format!(
            "{} '{}' must be a relative path inside its root",
            field, text
        )),
    }
}

fn check_not_blank(field: &str, value: &str) -> std::result::Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} must not be empty", field))
    } else {
        Ok(())
    }
}
