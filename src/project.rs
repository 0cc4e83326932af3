//! Project materialization
//!
//! Turns a [`Package`] into a project directory: the root folder is created,
//! pre plugins run, templates are written, and post plugins run, strictly in
//! that order. Every path is resolved against the project root and plugins are
//! started with the root as their working directory, so the process-wide
//! current directory is never changed and several projects can be created
//! concurrently.
//!
//! Nothing is rolled back on failure: files written and plugins run before the
//! failing step stay in place.
//!
//! # Examples
//!
//! ```no_run
//! use proji::{Config, Project, Package};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let package = Package::from_config("proji-python.toml")?;
//!
//! let project = Project::new("my-app", std::env::current_dir()?.join("my-app"), &package.label);
//! project.create(&package, &config.base_path)?;
//! # Ok(())
//! # }
//! ```

use crate::import::{PLUGINS_DIR, TEMPLATES_DIR};
use crate::{Error, Package, Plugin, Result, Template};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// A project directory created from a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,

    /// Absolute path of the project root
    pub path: PathBuf,

    /// Label of the package the project was created from
    pub package: String,
}

/// Materialization steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    CreateFolder,
    RunPreHooks,
    WriteTemplates,
    RunPostHooks,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::CreateFolder => "create folder",
            Phase::RunPreHooks => "run pre hooks",
            Phase::WriteTemplates => "write templates",
            Phase::RunPostHooks => "run post hooks",
        };
        f.write_str(name)
    }
}

impl Project {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            package: package.into(),
        }
    }

    /// Materialize `package` at this project's path
    ///
    /// `base_path` is the config directory holding the `templates/` and
    /// `plugins/` stores; a relative path is resolved against the current
    /// directory. Fails if a template or plugin path escapes its store or the
    /// project root, if the project root already exists, if a template cannot
    /// be written, or if any plugin fails to launch or exits with a non-zero
    /// status.
    pub fn create(&self, package: &Package, base_path: &Path) -> Result<()> {
        package.check_paths()?;

        // Plugins run inside the project root, so a relative store path would resolve there
        let base_path = std::path::absolute(base_path)?;
        let templates_dir = base_path.join(TEMPLATES_DIR);
        let plugins_dir = base_path.join(PLUGINS_DIR);

        tracing::debug!(project = %self.path.display(), phase = %Phase::CreateFolder);
        fs::create_dir(&self.path)?;

        tracing::debug!(project = %self.path.display(), phase = %Phase::RunPreHooks);
        for plugin in package.pre_plugins() {
            run_plugin(&plugins_dir, plugin, &self.path)?;
        }

        tracing::debug!(project = %self.path.display(), phase = %Phase::WriteTemplates);
        for template in &package.templates {
            write_template(&templates_dir, template, &self.path)?;
        }

        tracing::debug!(project = %self.path.display(), phase = %Phase::RunPostHooks);
        for plugin in package.post_plugins() {
            run_plugin(&plugins_dir, plugin, &self.path)?;
        }

        tracing::info!(project = %self.path.display(), package = %package.label, "project created");
        Ok(())
    }
}

/// Copy a template from the store (if it has a source) and make sure its destination exists
fn write_template(templates_dir: &Path, template: &Template, root: &Path) -> Result<()> {
    let destination = root.join(&template.destination);

    if !template.path.is_empty() {
        copy_recursively(&templates_dir.join(&template.path), &destination)?;
    }

    if template.is_file {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        // Creates an empty file but keeps content copied from the store
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&destination)?;
    } else {
        fs::create_dir_all(&destination)?;
    }
    Ok(())
}

/// Copy a file, or a folder with everything in it, to `destination`
fn copy_recursively(source: &Path, destination: &Path) -> Result<()> {
    if !fs::metadata(source)?.is_dir() {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, destination)?;
        return Ok(());
    }

    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::Other(format!("Failed to relativize path: {}", e)))?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Run a plugin executable with inherited stdio inside the project root
fn run_plugin(plugins_dir: &Path, plugin: &Plugin, root: &Path) -> Result<()> {
    let executable = plugins_dir.join(&plugin.path);
    tracing::debug!(plugin = %executable.display(), exec_number = plugin.exec_number, "running plugin");

    let status = Command::new(&executable)
        .current_dir(root)
        .status()
        .map_err(|source| Error::PluginLaunch {
            plugin: executable.clone(),
            source,
        })?;

    if !status.success() {
        return Err(Error::PluginFailed {
            plugin: executable,
            code: status.code(),
        });
    }
    Ok(())
}
