//! Shared fixtures for integration tests: projects, stores and package archives

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const ANDROID_MK: &str = "LOCAL_PATH := $(call my-dir)\n\
include $(CLEAR_VARS)\n\
LOCAL_MODULE := MyGame_shared\n\
LOCAL_SRC_FILES := $(LOCAL_SRC_FILES)\n\
include $(BUILD_SHARED_LIBRARY)\n";

pub const FOO_MANIFEST: &str = r#"{
  "format": 1,
  "steps": [
    {"type": "copy-file", "src": "src/Foo.cpp", "dst": "Foo.cpp"},
    {"type": "patch-build-descriptor", "platform": "android",
     "anchor": "LOCAL_SRC_FILES := $(LOCAL_SRC_FILES)",
     "insertion": "LOCAL_SRC_FILES += Foo.cpp"}
  ]
}"#;

pub const FOO_SOURCE: &str = "#include \"Foo.h\"\n";

/// A temp workspace holding a project and a package store.
pub struct Workspace {
    pub temp: TempDir,
    pub project: PathBuf,
    pub store: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("MyGame");
        let store = temp.path().join("store");
        fs::create_dir_all(&store).unwrap();
        Self {
            temp,
            project,
            store,
        }
    }

    /// Native project: `Classes/` plus the given `proj.*` dirs.
    pub fn native_project(&self, platforms: &[&str]) -> &Path {
        make_platforms(&self.project, platforms);
        fs::create_dir_all(self.project.join("Classes")).unwrap();
        &self.project
    }

    /// Scripted project: everything under `frameworks/runtime-src/`.
    pub fn scripted_project(&self, platforms: &[&str]) -> &Path {
        let runtime = self.project.join("frameworks/runtime-src");
        make_platforms(&runtime, platforms);
        fs::create_dir_all(runtime.join("Classes")).unwrap();
        &self.project
    }

    /// Catalogue a package in the store with the given archive entries.
    pub fn add_package(&self, name: &str, version: &str, entries: &[(&str, &[u8])]) -> PathBuf {
        let dir = self.store.join(name);
        fs::create_dir_all(&dir).unwrap();
        let archive = dir.join(format!("{}-{}.zip", name, version));
        build_zip(&archive, entries);
        fs::write(
            dir.join("package.json"),
            format!(
                r#"{{"name": "{}", "version": "{}", "author": "bar"}}"#,
                name, version
            ),
        )
        .unwrap();
        archive
    }

    /// The package "foo" 1.0 by "bar".
    pub fn add_foo(&self) -> PathBuf {
        self.add_package(
            "foo",
            "1.0",
            &[
                ("install.json", FOO_MANIFEST.as_bytes()),
                ("src/Foo.cpp", FOO_SOURCE.as_bytes()),
            ],
        )
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.project.join(relative)).unwrap()
    }
}

fn make_platforms(base: &Path, platforms: &[&str]) {
    for platform in platforms {
        fs::create_dir_all(base.join(format!("proj.{}", platform))).unwrap();
    }
    if platforms.contains(&"android") {
        let jni = base.join("proj.android/jni");
        fs::create_dir_all(&jni).unwrap();
        fs::write(jni.join("Android.mk"), ANDROID_MK).unwrap();
    }
}

pub fn build_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    for (name, contents) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(contents).unwrap();
    }
    zip.finish().unwrap();
}
