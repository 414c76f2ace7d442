pub mod archive;
pub mod installer;
pub mod interpreter;
pub mod manifest;
pub mod patch;
pub mod report;
pub mod store;

#[cfg(test)]
pub(crate) mod fixtures;

pub use installer::{install, PackageInstaller, Reporter, SilentReporter};
pub use manifest::{InstallManifest, InstallStep};
pub use report::{InstallResult, StepOutcome, StepReport};
pub use store::{CatalogStore, MemoryStore, PackageRecord, PackageStore};
