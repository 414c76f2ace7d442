//! Shared builders for package and project fixtures in unit tests

use crate::packages::store::{PackageRecord, DEFAULT_MANIFEST};
use crate::project::{self, Project};
use std::fs;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const ANDROID_MK: &str = "LOCAL_PATH := $(call my-dir)\n\
include $(CLEAR_VARS)\n\
LOCAL_MODULE := MyGame_shared\n\
LOCAL_SRC_FILES := $(LOCAL_SRC_FILES)\n\
LOCAL_C_INCLUDES := $(LOCAL_PATH)/../../Classes\n\
include $(BUILD_SHARED_LIBRARY)\n";

/// Write a zip archive with the given `(name, contents)` entries.
pub fn build_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, contents) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(contents).unwrap();
    }
    zip.finish().unwrap();
}

/// A native project with the given platform directories and a stock
/// Android makefile when android is among them.
pub fn native_project(root: &Path, platforms: &[&str]) -> Project {
    fs::create_dir_all(root.join("Classes")).unwrap();
    for platform in platforms {
        fs::create_dir_all(root.join(format!("proj.{}", platform))).unwrap();
    }
    if platforms.contains(&"android") {
        let jni = root.join("proj.android/jni");
        fs::create_dir_all(&jni).unwrap();
        fs::write(jni.join("Android.mk"), ANDROID_MK).unwrap();
    }
    project::resolve(root).unwrap()
}

pub fn record(name: &str, version: &str, archive: &Path) -> PackageRecord {
    PackageRecord {
        name: name.to_string(),
        version: version.to_string(),
        author: "bar".to_string(),
        archive_path: archive.to_path_buf(),
        manifest_path: DEFAULT_MANIFEST.into(),
        checksum: None,
    }
}
