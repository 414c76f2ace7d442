//! Local package store
//!
//! Packages fetched by other tooling are catalogued on disk, one directory
//! per package: `{store}/{name}/package.json` next to the package archive.
//! The installer only reads from the store.

use crate::error::{Error, Result};
use crate::packages::archive::safe_relative_path;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Metadata file inside each package's catalog directory.
pub const METADATA_FILE: &str = "package.json";

/// Default manifest location inside an unpacked package.
pub const DEFAULT_MANIFEST: &str = "install.json";

/// A catalogued package, ready to be installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    pub author: String,
    /// Absolute path of the package archive
    pub archive_path: PathBuf,
    /// Manifest path relative to the unpacked package root
    pub manifest_path: PathBuf,
    /// Expected lowercase hex SHA-256 of the archive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl PackageRecord {
    /// Directory name the package unpacks into, e.g. `foo-1.0`.
    pub fn unpack_dir_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// Reject records whose name, version or manifest path would resolve
    /// outside the package's own directory.
    pub fn check_paths(&self) -> Result<()> {
        for (field, value) in [("name", &self.name), ("version", &self.version)] {
            if !is_plain_segment(value) {
                return Err(Error::Catalog(format!(
                    "package {} '{}' must be a plain, non-empty name",
                    field, value
                )));
            }
        }

        let manifest = self.manifest_path.to_string_lossy();
        match safe_relative_path(&manifest) {
            Some(path) if !path.as_os_str().is_empty() => Ok(()),
            _ => Err(Error::Catalog(format!(
                "manifest path '{}' leaves the package directory",
                manifest
            ))),
        }
    }
}

fn is_plain_segment(value: &str) -> bool {
    !value.trim().is_empty()
        && value != "."
        && value != ".."
        && !value.contains(['/', '\\', ':', '\0'])
}

/// Read-only access to installed-package metadata.
pub trait PackageStore {
    /// Catalog entry for `name` (exact match), or `None` if not installed.
    fn lookup(&self, name: &str) -> Result<Option<PackageRecord>>;

    /// All catalogued packages, sorted by name.
    fn list(&self) -> Result<Vec<PackageRecord>>;
}

/// `package.json` as written by the fetching side.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct PackageMetadata {
    name: String,
    version: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    archive: Option<PathBuf>,
    #[serde(default)]
    manifest: Option<PathBuf>,
    #[serde(default)]
    checksum: Option<String>,
}

/// Store backed by a catalog directory on disk.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    root: PathBuf,
}

impl CatalogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Catalog directory of a package: `{store}/{name}/`
    pub fn package_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn read_record(&self, dir: &Path) -> Result<PackageRecord> {
        let metadata_path = dir.join(METADATA_FILE);
        let content = std::fs::read_to_string(&metadata_path)
            .map_err(|e| Error::file(&metadata_path, e))?;
        let meta: PackageMetadata = serde_json::from_str(&content).map_err(|e| {
            Error::Catalog(format!("{}: {}", metadata_path.display(), e))
        })?;

        let archive = meta
            .archive
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}-{}.zip", meta.name, meta.version)));
        let manifest = meta
            .manifest
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST));

        let record = PackageRecord {
            archive_path: dir.join(archive),
            manifest_path: manifest,
            checksum: meta.checksum.map(|c| c.to_lowercase()),
            name: meta.name,
            version: meta.version,
            author: meta.author,
        };
        record.check_paths().map_err(|e| match e {
            Error::Catalog(reason) => {
                Error::Catalog(format!("{}: {}", metadata_path.display(), reason))
            }
            other => other,
        })?;
        Ok(record)
    }
}

impl PackageStore for CatalogStore {
    fn lookup(&self, name: &str) -> Result<Option<PackageRecord>> {
        // Names are directory names; anything path-like cannot be catalogued
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Ok(None);
        }

        let dir = self.package_dir(name);
        if !dir.join(METADATA_FILE).is_file() {
            tracing::debug!("No catalog entry for '{}' in {}", name, self.root.display());
            return Ok(None);
        }

        let record = self.read_record(&dir)?;
        if record.name != name {
            tracing::debug!(
                "Catalog entry {} is named '{}', not '{}'",
                dir.display(),
                record.name,
                name
            );
            return Ok(None);
        }
        Ok(Some(record))
    }

    fn list(&self) -> Result<Vec<PackageRecord>> {
        let mut records = Vec::new();
        if !self.root.exists() {
            return Ok(records);
        }

        let entries = std::fs::read_dir(&self.root).map_err(|e| Error::file(&self.root, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::file(&self.root, e))?;
            let path = entry.path();
            if !path.join(METADATA_FILE).is_file() {
                continue;
            }
            match self.read_record(&path) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping unreadable catalog entry: {}", e),
            }
        }

        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }
}

/// Store held in memory, for tests and embedders.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, PackageRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: PackageRecord) {
        self.records.insert(record.name.clone(), record);
    }

    pub fn with(mut self, record: PackageRecord) -> Self {
        self.insert(record);
        self
    }
}

impl PackageStore for MemoryStore {
    fn lookup(&self, name: &str) -> Result<Option<PackageRecord>> {
        Ok(self.records.get(name).cloned())
    }

    fn list(&self) -> Result<Vec<PackageRecord>> {
        Ok(self.records.values().cloned().collect())
    }
}
