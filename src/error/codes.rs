//! Exit code mappings
//!
//! The process exit code is part of the CLI contract so that scripts can
//! tell a bad project root from a bad package name or a broken descriptor.

use super::Error;

pub const SUCCESS: i32 = 0;
pub const GENERIC: i32 = 1;
pub const PROJECT_UNRESOLVED: i32 = 2;
pub const PACKAGE_NOT_FOUND: i32 = 3;
pub const ARCHIVE_CORRUPT: i32 = 4;
pub const MANIFEST_INVALID: i32 = 5;
pub const STEP_FAILED: i32 = 6;
pub const IO: i32 = 10;

/// Map an error to the process exit code.
///
/// # Examples
///
/// ```
/// use pkgwire::error::codes::{exit_code, PACKAGE_NOT_FOUND};
/// use pkgwire::error::Error;
///
/// let err = Error::PackageNotFound { name: "foo".into() };
/// assert_eq!(exit_code(&err), PACKAGE_NOT_FOUND);
/// ```
pub fn exit_code(err: &Error) -> i32 {
    match err {
        Error::ProjectKindUnresolved { .. } => PROJECT_UNRESOLVED,
        Error::PackageNotFound { .. } => PACKAGE_NOT_FOUND,
        Error::ArchiveCorrupt { .. } | Error::ChecksumMismatch { .. } => ARCHIVE_CORRUPT,
        Error::ManifestInvalid { .. } => MANIFEST_INVALID,
        Error::DescriptorNotFound { .. }
        | Error::AnchorNotFound { .. }
        | Error::PatternNotFound { .. }
        | Error::InstallAborted { .. } => STEP_FAILED,
        Error::Io(_) | Error::FileIo { .. } | Error::DestinationNotWritable { .. } => IO,
        Error::Catalog(_) | Error::Config(_) => GENERIC,
    }
}
