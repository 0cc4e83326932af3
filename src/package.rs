//! Package, template and plugin definitions
//!
//! A package is a named bundle of templates (files and folders to create or
//! copy) and plugins (executables run around template creation). Packages are
//! written and read as TOML:
//!
//! ```toml
//! name = "python"
//! label = "py"
//! description = "A python project"
//!
//! [[template]]
//! is_file = true
//! path = "python/main.py"
//! destination = "src/main.py"
//!
//! [[plugin]]
//! path = "git-init.sh"
//! exec_number = -1
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// A reusable bundle of templates and plugins, identified by its label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,

    /// Short identifier, unique among stored packages
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, rename = "template")]
    pub templates: Vec<Template>,

    #[serde(default, rename = "plugin")]
    pub plugins: Vec<Plugin>,

    /// Built-in fallback packages are hidden from listings
    #[serde(skip)]
    pub is_default: bool,
}

/// A file or folder to create when a project is materialized
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub is_file: bool,

    /// Source path relative to the template store; empty means nothing is copied
    #[serde(default)]
    pub path: String,

    /// Path relative to the project root
    pub destination: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An executable run before (negative exec number) or after (positive) template creation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    /// Executable path relative to the plugin store
    pub path: String,

    #[serde(default)]
    pub exec_number: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Package {
    /// Create an empty package
    ///
    /// `is_default` should only be true for fallback packages that are hidden
    /// from users.
    pub fn new(name: impl Into<String>, label: impl Into<String>, is_default: bool) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            is_default,
            ..Self::default()
        }
    }

    /// True when the package holds neither templates nor plugins
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty() && self.plugins.is_empty()
    }

    /// Check the fields every stored package needs
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Validation("name cannot be an empty string".to_string()));
        }
        if self.label.is_empty() {
            return Err(Error::Validation("label cannot be an empty string".to_string()));
        }
        if self.is_empty() {
            return Err(Error::Validation(
                "no relevant data was found, config might be empty".to_string(),
            ));
        }
        self.check_paths()
    }

    /// Reject template and plugin paths that would leave the project root or their store
    pub fn check_paths(&self) -> Result<()> {
        for template in &self.templates {
            ensure_contained("template path", &template.path)?;
            ensure_contained("template destination", &template.destination)?;
        }
        for plugin in &self.plugins {
            ensure_contained("plugin path", &plugin.path)?;
        }
        Ok(())
    }

    /// Plugins that run before templates are written, in declaration order
    pub fn pre_plugins(&self) -> impl Iterator<Item = &Plugin> {
        self.plugins.iter().filter(|p| p.exec_number < 0)
    }

    /// Plugins that run after templates are written, in declaration order
    ///
    /// Plugins with an exec number of zero belong to neither phase.
    pub fn post_plugins(&self) -> impl Iterator<Item = &Plugin> {
        self.plugins.iter().filter(|p| p.exec_number > 0)
    }

    /// File name used when exporting this package
    pub fn config_file_name(&self) -> String {
        format!("proji-{}.toml", self.name)
    }

    /// Write the package as a TOML config into `destination` and return the file path
    pub fn export_config<P: AsRef<Path>>(&self, destination: P) -> Result<PathBuf> {
        let path = destination.as_ref().join(self.config_file_name());
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(path)
    }
}

/// Relative paths made only of plain components stay below whatever they are joined onto
fn ensure_contained(kind: &str, path: &str) -> Result<()> {
    let contained = Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if contained {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{} '{}' must be relative and must not contain '..'",
            kind, path
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_package() -> Package {
        let mut package = Package::new("python", "py", false);
        package.description = Some("A python project".to_string());
        package.templates.push(Template {
            is_file: true,
            path: "python/main.py".to_string(),
            destination: "src/main.py".to_string(),
            description: None,
        });
        package.plugins = vec![
            Plugin {
                path: "git-init.sh".to_string(),
                exec_number: -1,
                description: None,
            },
            Plugin {
                path: "noop.sh".to_string(),
                exec_number: 0,
                description: None,
            },
            Plugin {
                path: "venv.sh".to_string(),
                exec_number: 2,
                description: None,
            },
            Plugin {
                path: "readme.sh".to_string(),
                exec_number: 1,
                description: None,
            },
        ];
        package
    }

    #[test]
    fn test_validate() {
        assert!(sample_package().validate().is_ok());

        let mut package = sample_package();
        package.name.clear();
        assert!(matches!(package.validate(), Err(Error::Validation(_))));

        let mut package = sample_package();
        package.label.clear();
        assert!(matches!(package.validate(), Err(Error::Validation(_))));

        let package = Package::new("empty", "e", false);
        assert!(package.is_empty());
        assert!(matches!(package.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_escaping_paths() {
        let mut package = sample_package();
        package.templates[0].destination = "../../.bashrc".to_string();
        assert!(matches!(package.validate(), Err(Error::Validation(_))));

        let mut package = sample_package();
        package.templates[0].path = "/etc/passwd".to_string();
        assert!(matches!(package.validate(), Err(Error::Validation(_))));

        let mut package = sample_package();
        package.plugins[0].path = "scripts/../../bin/sh".to_string();
        assert!(matches!(package.validate(), Err(Error::Validation(_))));

        let mut package = sample_package();
        package.templates[0].destination = "./src/nested/main.py".to_string();
        assert!(package.validate().is_ok());
    }

    #[test]
    fn test_plugin_phases_keep_declaration_order() {
        let package = sample_package();
        let pre: Vec<&str> = package.pre_plugins().map(|p| p.path.as_str()).collect();
        let post: Vec<&str> = package.post_plugins().map(|p| p.path.as_str()).collect();

        assert_eq!(pre, vec!["git-init.sh"]);
        assert_eq!(post, vec!["venv.sh", "readme.sh"]);
    }

    #[test]
    fn test_export_writes_named_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = sample_package().export_config(temp_dir.path()).unwrap();

        assert_eq!(path, temp_dir.path().join("proji-python.toml"));
        let content = fs::read_to_string(&path).unwrap();
        let name_pos = content.find("name =").unwrap();
        let label_pos = content.find("label =").unwrap();
        let template_pos = content.find("[[template]]").unwrap();
        let plugin_pos = content.find("[[plugin]]").unwrap();
        assert!(name_pos < label_pos && label_pos < template_pos && template_pos < plugin_pos);

        let parsed: Package = toml::from_str(&content).unwrap();
        assert_eq!(parsed, sample_package());
    }

    #[test]
    fn test_is_default_is_not_serialized() {
        let package = Package::new("fallback", "fb", true);
        let content = toml::to_string(&package).unwrap();
        assert!(!content.contains("is_default"));
    }
}
