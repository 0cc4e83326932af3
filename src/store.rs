//! File-backed package and project store
//!
//! Packages and projects live in a single JSON document. Removing a package
//! only marks it as deleted; its label can then be reused by a new package.
//!
//! # Examples
//!
//! ```no_run
//! use proji::{Config, Package, Store};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let mut store = Store::open(config.storage_path())?;
//!
//! let package = Package::from_config("proji-python.toml")?;
//! store.save_package(package)?;
//!
//! for package in store.load_packages(&[])? {
//!     println!("{} ({})", package.name, package.label);
//! }
//! # Ok(())
//! # }
//! ```

use crate::{Error, Package, Project, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    packages: Vec<StoredPackage>,
    #[serde(default)]
    projects: Vec<StoredProject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredPackage {
    #[serde(flatten)]
    package: Package,
    #[serde(default)]
    is_default: bool,
    created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deleted_at: Option<String>,
}

impl StoredPackage {
    fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    fn to_package(&self) -> Package {
        let mut package = self.package.clone();
        package.is_default = self.is_default;
        package
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredProject {
    #[serde(flatten)]
    project: Project,
    created_at: String,
}

/// Persistent store for packages and projects
pub struct Store {
    path: PathBuf,
    data: StoreData,
}

impl Store {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            StoreData::default()
        };
        Ok(Self { path, data })
    }

    /// Location of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn live_package(&self, label: &str) -> Option<&StoredPackage> {
        self.data
            .packages
            .iter()
            .find(|p| p.is_live() && p.package.label == label)
    }

    /// Save a new package; its label must not be used by another stored package
    pub fn save_package(&mut self, package: Package) -> Result<()> {
        package.validate()?;
        if self.live_package(&package.label).is_some() {
            return Err(Error::Duplicate(format!(
                "a package with label '{}' is already stored",
                package.label
            )));
        }

        tracing::debug!(label = %package.label, "saving package");
        self.data.packages.push(StoredPackage {
            is_default: package.is_default,
            package,
            created_at: Utc::now().to_rfc3339(),
            deleted_at: None,
        });
        self.flush()
    }

    /// Load the package with the given label
    pub fn load_package(&self, label: &str) -> Result<Package> {
        self.live_package(label)
            .map(StoredPackage::to_package)
            .ok_or_else(|| Error::PackageNotFound(format!("no package with label '{}'", label)))
    }

    /// Load the packages with the given labels, or every non-default package when `labels` is empty
    pub fn load_packages(&self, labels: &[String]) -> Result<Vec<Package>> {
        if labels.is_empty() {
            return Ok(self
                .data
                .packages
                .iter()
                .filter(|p| p.is_live() && !p.is_default)
                .map(StoredPackage::to_package)
                .collect());
        }
        labels.iter().map(|label| self.load_package(label)).collect()
    }

    /// Mark the package with the given label as deleted
    pub fn remove_package(&mut self, label: &str) -> Result<()> {
        let stored = self
            .data
            .packages
            .iter_mut()
            .find(|p| p.is_live() && p.package.label == label)
            .ok_or_else(|| Error::PackageNotFound(format!("no package with label '{}'", label)))?;

        stored.deleted_at = Some(Utc::now().to_rfc3339());
        self.flush()
    }

    /// Record a project; its path must be unique
    pub fn save_project(&mut self, project: Project) -> Result<()> {
        if self.data.projects.iter().any(|p| p.project.path == project.path) {
            return Err(Error::Duplicate(format!(
                "a project at {} is already stored",
                project.path.display()
            )));
        }

        self.data.projects.push(StoredProject {
            project,
            created_at: Utc::now().to_rfc3339(),
        });
        self.flush()
    }

    /// All recorded projects
    pub fn load_projects(&self) -> Vec<Project> {
        self.data
            .projects
            .iter()
            .map(|p| p.project.clone())
            .collect()
    }

    /// Forget the project at `path` (the directory itself is left alone)
    pub fn remove_project(&mut self, path: &Path) -> Result<()> {
        let before = self.data.projects.len();
        self.data.projects.retain(|p| p.project.path != path);
        if self.data.projects.len() == before {
            return Err(Error::ProjectNotFound(path.display().to_string()));
        }
        self.flush()
    }

    /// Point the project recorded at `old_path` to `new_path`
    pub fn update_project_location(&mut self, old_path: &Path, new_path: &Path) -> Result<()> {
        if self.data.projects.iter().any(|p| p.project.path == new_path) {
            return Err(Error::Duplicate(format!(
                "a project at {} is already stored",
                new_path.display()
            )));
        }

        let stored = self
            .data
            .projects
            .iter_mut()
            .find(|p| p.project.path == old_path)
            .ok_or_else(|| Error::ProjectNotFound(old_path.display().to_string()))?;

        stored.project.path = new_path.to_path_buf();
        if let Some(name) = new_path.file_name() {
            stored.project.name = name.to_string_lossy().into_owned();
        }
        self.flush()
    }
}
