//! User configuration and the base config directory
//!
//! Everything proji keeps lives below one base directory: the optional
//! `config.toml`, the `templates/` and `plugins/` stores, and the package
//! database. The directory is OS specific and can be overridden with
//! `PROJI_CONFIG_DIR`.
//!
//! # Examples
//!
//! ```no_run
//! use proji::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//!
//! println!("Base path: {}", config.base_path.display());
//! println!("Excluded folders: {:?}", config.import.exclude_folders);
//! # Ok(())
//! # }
//! ```

use crate::import::{PLUGINS_DIR, TEMPLATES_DIR};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name inside the base directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// User configuration file (`<base>/config.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory the config was loaded from
    #[serde(skip)]
    pub base_path: PathBuf,

    /// Import settings
    #[serde(default)]
    pub import: ImportConfig,

    /// Package store settings
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Folder names skipped when importing a package from a directory
    #[serde(default)]
    pub exclude_folders: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store location; relative paths resolve against the base directory
    #[serde(default = "default_storage_path")]
    pub path: String,
}

fn default_storage_path() -> String {
    "db/proji.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// OS specific base config directory
///
/// Uses PROJI_CONFIG_DIR if set.
pub fn base_config_path() -> Result<PathBuf> {
    if let Ok(config_dir) = std::env::var("PROJI_CONFIG_DIR") {
        if !config_dir.is_empty() {
            return Ok(PathBuf::from(shellexpand::tilde(&config_dir).into_owned()));
        }
    }

    match std::env::consts::OS {
        "linux" => Ok(home_dir()?.join(".config").join("proji")),
        "macos" => Ok(home_dir()?
            .join("Library")
            .join("Application Support")
            .join("proji")),
        // %APPDATA%
        "windows" => dirs::config_dir()
            .map(|dir| dir.join("proji"))
            .ok_or_else(|| Error::Other("Could not determine APPDATA directory".to_string())),
        other => Err(Error::UnsupportedOs(other.to_string())),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| Error::Other("Could not determine home directory".to_string()))
}

/// Resolve `path` against `base` unless it is already absolute
pub fn resolve_against(base: &Path, path: &str) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(path).into_owned());
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

impl Config {
    /// Load the config from the default base directory
    ///
    /// Environment variable overrides:
    /// - `PROJI_IMPORT_EXCLUDE_FOLDERS`: comma separated folder names
    /// - `PROJI_STORAGE_PATH`: overrides `storage.path`
    pub fn load() -> Result<Self> {
        Self::load_from(base_config_path()?)
    }

    /// Load the config from `base_path`, falling back to defaults when no file exists
    pub fn load_from<P: Into<PathBuf>>(base_path: P) -> Result<Self> {
        let base_path = base_path.into();
        let path = base_path.join(CONFIG_FILE_NAME);

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str::<Config>(&content)?
        } else {
            Self::default()
        };
        config.base_path = base_path;

        if let Ok(folders) = std::env::var("PROJI_IMPORT_EXCLUDE_FOLDERS") {
            config.import.exclude_folders = folders
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect();
        }
        if let Ok(storage_path) = std::env::var("PROJI_STORAGE_PATH") {
            if !storage_path.is_empty() {
                config.storage.path = storage_path;
            }
        }

        Ok(config)
    }

    /// Save the config into its base directory
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        let content = toml::to_string_pretty(self)?;
        fs::write(self.base_path.join(CONFIG_FILE_NAME), content)?;
        Ok(())
    }

    /// Directory templates are copied from
    pub fn templates_dir(&self) -> PathBuf {
        self.base_path.join(TEMPLATES_DIR)
    }

    /// Directory plugins are run from
    pub fn plugins_dir(&self) -> PathBuf {
        self.base_path.join(PLUGINS_DIR)
    }

    /// Absolute location of the package store
    pub fn storage_path(&self) -> PathBuf {
        resolve_against(&self.base_path, &self.storage.path)
    }
}
