pub mod root;
pub mod user_config;

pub use root::resolve;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Name of the per-project directory that holds unpacked packages.
pub const PACKAGES_DIRNAME: &str = "packages";

/// How the host project is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProjectKind {
    /// C++ project with `Classes/` at the root
    #[serde(rename = "cpp")]
    Native,
    /// Lua/JS project with native code under `frameworks/runtime-src/`
    #[serde(rename = "script")]
    Scripted,
}

impl ProjectKind {
    /// Directory (relative to the project root) that holds the `proj.*` trees.
    pub fn prefix(&self) -> &'static Path {
        match self {
            ProjectKind::Native => Path::new(""),
            ProjectKind::Scripted => Path::new("frameworks/runtime-src"),
        }
    }

    /// Source directory relative to the project root.
    pub fn classes_dir(&self) -> PathBuf {
        self.prefix().join("Classes")
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectKind::Native => "cpp",
            ProjectKind::Scripted => "script",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A target platform with its own native project directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    Android,
    IosMac,
    Win32,
}

/// Where a platform keeps its build descriptor, relative to the platform root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorLocation {
    /// A fixed relative path
    Fixed(&'static str),
    /// The first file with this extension directly inside the platform root
    FileWithExtension(&'static str),
    /// A fixed file name inside the first directory with this extension
    InsideDirWithExtension(&'static str, &'static str),
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Android, Platform::IosMac, Platform::Win32];

    pub fn id(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::IosMac => "ios_mac",
            Platform::Win32 => "win32",
        }
    }

    /// Name of the platform's directory, e.g. `proj.android`.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Platform::Android => "proj.android",
            Platform::IosMac => "proj.ios_mac",
            Platform::Win32 => "proj.win32",
        }
    }

    pub fn descriptor(&self) -> DescriptorLocation {
        match self {
            Platform::Android => DescriptorLocation::Fixed("jni/Android.mk"),
            Platform::IosMac => {
                DescriptorLocation::InsideDirWithExtension("xcodeproj", "project.pbxproj")
            }
            Platform::Win32 => DescriptorLocation::FileWithExtension("vcxproj"),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "ios_mac" | "ios-mac" => Ok(Platform::IosMac),
            "win32" => Ok(Platform::Win32),
            other => Err(format!(
                "unknown platform '{}' (expected one of: android, ios_mac, win32)",
                other
            )),
        }
    }
}

impl TryFrom<String> for Platform {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.id().to_string()
    }
}

/// A resolved host project.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    /// Absolute project root
    pub path: PathBuf,
    pub kind: ProjectKind,
    /// Source directory relative to `path`
    pub classes_dir: PathBuf,
    /// Platforms whose `proj.*` directory exists, with absolute paths
    pub platform_roots: BTreeMap<Platform, PathBuf>,
    /// Absolute directory where packages are unpacked
    pub packages_dir: PathBuf,
}

impl Project {
    /// Absolute path of the source directory.
    pub fn classes_path(&self) -> PathBuf {
        self.path.join(&self.classes_dir)
    }

    pub fn platform_root(&self, platform: Platform) -> Option<&Path> {
        self.platform_roots.get(&platform).map(PathBuf::as_path)
    }

    pub fn platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.platform_roots.keys().copied()
    }
}
