#![allow(dead_code)]

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use assert_cmd::assert::Assert;
use serde_json::Value;
use zip::write::FileOptions;

/// Write a source-hosting style archive: a single `root/` directory entry
/// followed by `files` (paths relative to that root).
pub fn write_repo_zip(dir: &Path, root: &str, files: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(format!("{root}.zip"));
    let file = File::create(&path).expect("create zip");
    let mut writer = zip::ZipWriter::new(file);
    let options = FileOptions::default();
    writer
        .add_directory(format!("{root}/"), options)
        .expect("root dir entry");
    for (name, contents) in files {
        writer
            .start_file(format!("{root}/{name}"), options)
            .expect("start entry");
        writer.write_all(contents.as_bytes()).expect("write entry");
    }
    writer.finish().expect("finish zip");
    path
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write file");
    path
}

pub fn stdout(assert: &Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout")
}

pub fn stderr(assert: &Assert) -> String {
    String::from_utf8(assert.get_output().stderr.clone()).expect("utf8 stderr")
}

pub fn parse_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("valid json")
}

/// Install an executable shell script standing in for forge.
#[cfg(unix)]
pub fn fake_forge(dir: &Path, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = write_file(dir, "forge", &format!("#!/bin/sh\n{script}\n"));
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod forge");
    path
}
