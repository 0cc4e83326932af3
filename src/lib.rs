//! Proji - create projects from reusable packages of templates and plugins
//!
//! A package bundles file and folder templates with plugins (executables run
//! before or after the templates are written). Packages can be written by
//! hand, imported by mirroring a local directory or a remote repository, or
//! imported in bulk from a remote collection. Creating a project materializes
//! a package into a fresh directory.
//!
//! # Examples
//!
//! ```no_run
//! use proji::{Config, Package, Project, Store};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let mut store = Store::open(config.storage_path())?;
//!
//! // Mirror an existing project layout into a package
//! let package = Package::from_directory("./template-project", &config.import.exclude_folders)?;
//! store.save_package(package.clone())?;
//!
//! // Create a new project from it
//! let project = Project::new("new-app", std::env::current_dir()?.join("new-app"), &package.label);
//! project.create(&package, &config.base_path)?;
//! store.save_project(project)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`package`] - Package, template and plugin definitions
//! - [`label`] - Label derivation from package names
//! - [`tree`] - Remote tree entries and their conversion to templates
//! - [`remote`] - GitHub and GitLab importers
//! - [`fetch`] - Concurrent, best-effort downloads
//! - [`import`] - Config, directory, repository and collection imports
//! - [`project`] - Project materialization
//! - [`store`] - File-backed package and project store
//! - [`config`] - User configuration and the base config directory
//! - [`error`] - Error types and result handling

pub mod config;
pub mod error;
pub mod fetch;
pub mod import;
pub mod label;
pub mod package;
pub mod project;
pub mod remote;
pub mod store;
pub mod tree;

pub use config::{base_config_path, Config};
pub use error::{Error, Result};
pub use import::{ImportedCollection, RemoteImport};
pub use label::derive_label;
pub use package::{Package, Plugin, Template};
pub use project::{Phase, Project};
pub use store::Store;
pub use tree::{filter_and_convert, EntryKind, TreeEntry};
