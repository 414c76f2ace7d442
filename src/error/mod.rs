pub mod codes;

use crate::packages::report::InstallResult;
use crate::project::Platform;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No project found at {}: expected Classes/ or frameworks/runtime-src/Classes/", path.display())]
    ProjectKindUnresolved { path: PathBuf },

    #[error("Package '{name}' not found")]
    PackageNotFound { name: String },

    #[error("Corrupt archive {}: {reason}", path.display())]
    ArchiveCorrupt { path: PathBuf, reason: String },

    #[error("Cannot write to {}: {source}", path.display())]
    DestinationNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Checksum mismatch for {}: expected {expected}, got {actual}", path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Invalid install manifest {}: {reason}", path.display())]
    ManifestInvalid { path: PathBuf, reason: String },

    #[error("No {platform} build descriptor found at {}", path.display())]
    DescriptorNotFound { platform: Platform, path: PathBuf },

    #[error("Anchor {anchor:?} not found in {} ({platform})", path.display())]
    AnchorNotFound {
        platform: Platform,
        path: PathBuf,
        anchor: String,
    },

    #[error("Pattern {pattern:?} not found in {}", path.display())]
    PatternNotFound { path: PathBuf, pattern: String },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Install step {step} ({kind}) failed: {source}")]
    InstallAborted {
        step: usize,
        kind: &'static str,
        #[source]
        source: Box<Error>,
        partial: Box<InstallResult>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Attach a path to a bare I/O error.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileIo {
            path: path.into(),
            source,
        }
    }

    /// Stable key into the message catalog for user-facing output.
    pub fn message_key(&self) -> &'static str {
        match self {
            Error::Io(_) => "ERROR_IO_BARE_FMT",
            Error::FileIo { .. } => "ERROR_IO_FMT",
            Error::ProjectKindUnresolved { .. } => "ERROR_PROJECT_UNRESOLVED",
            Error::PackageNotFound { .. } => "PACKAGE_NOT_FOUND_FMT",
            Error::ArchiveCorrupt { .. } => "ERROR_ARCHIVE_CORRUPT_FMT",
            Error::DestinationNotWritable { .. } => "ERROR_NOT_WRITABLE_FMT",
            Error::ChecksumMismatch { .. } => "ERROR_CHECKSUM_FMT",
            Error::ManifestInvalid { .. } => "ERROR_MANIFEST_INVALID_FMT",
            Error::DescriptorNotFound { .. } => "ERROR_DESCRIPTOR_NOT_FOUND_FMT",
            Error::AnchorNotFound { .. } => "ERROR_ANCHOR_NOT_FOUND_FMT",
            Error::PatternNotFound { .. } => "ERROR_PATTERN_NOT_FOUND_FMT",
            Error::Catalog(_) => "ERROR_CATALOG_FMT",
            Error::Config(_) => "ERROR_CONFIG_FMT",
            Error::InstallAborted { .. } => "ERROR_STEP_FAILED_FMT",
        }
    }

    /// Positional arguments for the message returned by [`Error::message_key`].
    pub fn message_args(&self) -> Vec<String> {
        match self {
            Error::Io(e) => vec![e.to_string()],
            Error::FileIo { path, source } | Error::DestinationNotWritable { path, source } => {
                vec![path.display().to_string(), source.to_string()]
            }
            Error::ProjectKindUnresolved { .. } => Vec::new(),
            Error::PackageNotFound { name } => vec![name.clone()],
            Error::ArchiveCorrupt { path, reason } | Error::ManifestInvalid { path, reason } => {
                vec![path.display().to_string(), reason.clone()]
            }
            Error::ChecksumMismatch {
                path,
                expected,
                actual,
            } => vec![path.display().to_string(), expected.clone(), actual.clone()],
            Error::DescriptorNotFound { platform, path } => {
                vec![platform.to_string(), path.display().to_string()]
            }
            Error::AnchorNotFound {
                platform,
                path,
                anchor,
            } => vec![anchor.clone(), path.display().to_string(), platform.to_string()],
            Error::PatternNotFound { path, pattern } => {
                vec![pattern.clone(), path.display().to_string()]
            }
            Error::Catalog(msg) | Error::Config(msg) => vec![msg.clone()],
            Error::InstallAborted {
                step, kind, source, ..
            } => vec![step.to_string(), kind.to_string(), source.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_keeps_path() {
        let err = Error::file(
            "/tmp/x/Android.mk",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("Android.mk"));
        assert!(msg.contains("denied"));
        assert_eq!(err.message_key(), "ERROR_IO_FMT");
    }

    #[test]
    fn test_anchor_not_found_names_file_and_platform() {
        let err = Error::AnchorNotFound {
            platform: Platform::Android,
            path: PathBuf::from("proj.android/jni/Android.mk"),
            anchor: "LOCAL_SRC_FILES :=".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Android.mk"));
        assert!(msg.contains("android"));

        let args = err.message_args();
        assert_eq!(args.len(), 3);
        assert_eq!(args[2], "android");
    }

    #[test]
    fn test_not_found_args() {
        let err = Error::PackageNotFound {
            name: "foo".to_string(),
        };
        assert_eq!(err.message_key(), "PACKAGE_NOT_FOUND_FMT");
        assert_eq!(err.message_args(), vec!["foo".to_string()]);
    }
}
