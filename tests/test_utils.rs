//! Test utilities shared by the proji integration tests.
//!
//! Provides an isolated config directory, a local stand-in for a remote
//! repository, and a fetcher that copies from it instead of downloading.

#![allow(dead_code)]

use proji::fetch::Fetch;
use proji::remote::Importer;
use proji::{EntryKind, Result, TreeEntry};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Isolated base config directory plus a workspace to create projects in
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub config_dir: PathBuf,
    pub workspace: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_dir = temp_dir.path().join("config");
        let workspace = temp_dir.path().join("workspace");

        fs::create_dir_all(&config_dir).expect("Failed to create config directory");
        fs::create_dir_all(&workspace).expect("Failed to create workspace");

        Self {
            temp_dir,
            config_dir,
            workspace,
        }
    }

    /// Write a file below the base config directory
    pub fn write_config_file(&self, relative: &str, content: &str) -> PathBuf {
        write_file(&self.config_dir, relative, content)
    }
}

/// Create `relative` (and its parents) below `root`
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&path, content).expect("Failed to write file");
    path
}

/// A repository that lives in a local directory
pub struct LocalRepository {
    pub root: PathBuf,
    pub name: String,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>, name: &str) -> Self {
        Self {
            root: root.into(),
            name: name.to_string(),
        }
    }
}

impl Importer for LocalRepository {
    fn load_tree_entries(&self) -> Result<Vec<TreeEntry>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .expect("walked path is below root")
                .to_string_lossy()
                .replace('\\', "/");
            let kind = if entry.file_type().is_dir() {
                EntryKind::Tree
            } else {
                EntryKind::Blob
            };
            entries.push(TreeEntry::new(relative, kind));
        }
        Ok(entries)
    }

    fn file_path_to_raw_uri(&self, relative_path: &str) -> String {
        self.root.join(relative_path).to_string_lossy().into_owned()
    }

    fn repository_name(&self) -> &str {
        &self.name
    }
}

/// Copies local files, recording every source it was asked for
#[derive(Default)]
pub struct CopyFetcher {
    pub requested: Mutex<Vec<String>>,
}

impl CopyFetcher {
    pub fn requested(&self) -> Vec<String> {
        let mut requested = self.requested.lock().unwrap().clone();
        requested.sort();
        requested
    }
}

impl Fetch for CopyFetcher {
    fn fetch(&self, source: &str, destination: &Path) -> Result<()> {
        self.requested.lock().unwrap().push(source.to_string());
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, destination)?;
        Ok(())
    }
}
