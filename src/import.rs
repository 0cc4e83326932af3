//! Package import from config files, local directories and remote repositories
//!
//! # Examples
//!
//! ```no_run
//! use proji::fetch::HttpFetcher;
//! use proji::remote::importer_for_url;
//! use proji::{Package, RemoteImport};
//! use url::Url;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // From a hand-written config
//! let package = Package::from_config("proji-python.toml")?;
//!
//! // By mirroring a local directory, skipping .git folders
//! let package = Package::from_directory("./my-template", &[".git".to_string()])?;
//!
//! // All packages of a remote collection
//! let url = Url::parse("https://github.com/nikoksr/proji-official-collection")?;
//! let importer = importer_for_url(&url)?;
//! let fetcher = HttpFetcher::new()?;
//! let collection = RemoteImport::new(importer.as_ref(), &fetcher, "/home/me/.config/proji")
//!     .import_collection(&url)?;
//! println!("imported {} packages", collection.packages.len());
//! # Ok(())
//! # }
//! ```

use crate::fetch::{fetch_all, fetch_if_missing, Fetch, FetchJob};
use crate::label::derive_label;
use crate::remote::Importer;
use crate::tree::{filter_and_convert, EntryKind};
use crate::{Error, Package, Result, Template};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use url::Url;
use walkdir::WalkDir;

/// Folder holding template files, both in collections and in the base config directory
pub const TEMPLATES_DIR: &str = "templates";
/// Folder holding plugin executables
pub const PLUGINS_DIR: &str = "plugins";
/// Folder holding package configs inside a collection
pub const CONFIGS_DIR: &str = "configs";

impl Package {
    /// Import a package from a TOML config file
    ///
    /// The file must have a `.toml` extension, must not be empty, and must
    /// describe a package with a name, a label and at least one template or plugin.
    pub fn from_config<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.extension().and_then(|e| e.to_str()) != Some("toml") {
            return Err(Error::Validation(format!(
                "import file {} has to be of type 'toml'",
                path.display()
            )));
        }
        if fs::metadata(path)?.len() == 0 {
            return Err(Error::Validation(format!(
                "import file {} is empty",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let package: Package = toml::from_str(&content)?;
        package.validate()?;

        tracing::info!(label = %package.label, config = %path.display(), "imported package from config");
        Ok(package)
    }

    /// Import a package by mirroring the structure of a local directory
    ///
    /// Every file and folder below `path` becomes a template with an empty
    /// source path. Folders whose name is listed in `exclude_dirs` are pruned
    /// together with everything inside them.
    pub fn from_directory<P: AsRef<Path>>(path: P, exclude_dirs: &[String]) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("directory {} does not exist", path.display()),
            )));
        }

        let root = fs::canonicalize(path)?;
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                Error::Validation(format!(
                    "could not determine a package name from {}",
                    path.display()
                ))
            })?;
        let mut package = Package::new(name.as_str(), derive_label(&name), false);

        let walker = WalkDir::new(&root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !is_excluded(entry.file_name().to_str(), exclude_dirs)
            });

        for entry in walker {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(&root)
                .map_err(|e| Error::Other(format!("Failed to relativize path: {}", e)))?;

            package.templates.push(Template {
                is_file: !entry.file_type().is_dir(),
                path: String::new(),
                destination: to_slash_path(relative),
                description: None,
            });
        }

        if package.is_empty() {
            return Err(Error::Validation(format!(
                "no relevant data was found, directory {} might be empty",
                path.display()
            )));
        }

        tracing::info!(
            label = %package.label,
            templates = package.templates.len(),
            "imported package from directory"
        );
        Ok(package)
    }
}

fn is_excluded(dir_name: Option<&str>, exclude_dirs: &[String]) -> bool {
    dir_name.is_some_and(|name| exclude_dirs.iter().any(|excluded| excluded == name))
}

fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn prefix_filter(prefix: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("^{}/", regex::escape(prefix)))?)
}

/// Packages imported from a collection, plus the failures of the ones that could not be imported
#[derive(Debug, Default)]
pub struct ImportedCollection {
    pub packages: Vec<Package>,
    pub failures: Vec<String>,
}

impl ImportedCollection {
    /// All failures merged into one error, if there were any
    pub fn error(&self) -> Option<Error> {
        if self.failures.is_empty() {
            None
        } else {
            Some(Error::Aggregate(self.failures.clone()))
        }
    }
}

/// Imports packages from a remote repository
///
/// Templates and plugins that packages depend on are downloaded into
/// `templates/` and `plugins/` below the base config directory. Package
/// configs are staged below a separate directory (the system temp dir by
/// default) before they are read.
pub struct RemoteImport<'a> {
    importer: &'a dyn Importer,
    fetcher: &'a dyn Fetch,
    base_path: PathBuf,
    staging_dir: PathBuf,
}

impl<'a> RemoteImport<'a> {
    pub fn new<P: Into<PathBuf>>(
        importer: &'a dyn Importer,
        fetcher: &'a dyn Fetch,
        base_path: P,
    ) -> Self {
        Self {
            importer,
            fetcher,
            base_path: base_path.into(),
            staging_dir: std::env::temp_dir().join("proji"),
        }
    }

    /// Stage downloaded package configs below `dir` instead of the system temp dir
    pub fn with_staging_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.staging_dir = dir.into();
        self
    }

    /// Import a package that mirrors the complete repository tree
    pub fn import_structure(&self) -> Result<Package> {
        let templates = self.filtered_templates(&[])?;
        if templates.is_empty() {
            return Err(Error::Validation(format!(
                "no relevant data was found in repository {}",
                self.importer.repository_name()
            )));
        }

        let mut package = self.package_named_after_repo();
        package.templates = templates;

        tracing::info!(
            label = %package.label,
            templates = package.templates.len(),
            "imported package from repository structure"
        );
        Ok(package)
    }

    /// Import the package config that `package_url` points to, and download its templates and plugins
    ///
    /// Dependency downloads run concurrently; if any of them fail the error
    /// lists every failure, while the files that were fetched stay in place.
    pub fn import_package(&self, package_url: &Url) -> Result<Package> {
        let file_name = package_url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(|segment| {
                urlencoding::decode(segment)
                    .map(|s| s.into_owned())
                    .unwrap_or_else(|_| segment.to_string())
            })
            .ok_or_else(|| {
                Error::Validation(format!("URL {} does not point to a file", package_url))
            })?;

        let config_path = self
            .staging_dir
            .join(self.importer.repository_name())
            .join(CONFIGS_DIR)
            .join(&file_name);
        let config_job = FetchJob::new(
            &config_path,
            self.importer
                .file_path_to_raw_uri(&format!("{}/{}", CONFIGS_DIR, file_name)),
        );
        fetch_if_missing(self.fetcher, &config_job)?;

        let package = Package::from_config(&config_path)?;
        let jobs = self.dependency_jobs(&package)?;
        let summary = fetch_all(self.fetcher, &jobs)?;

        tracing::info!(
            label = %package.label,
            fetched = summary.fetched,
            skipped = summary.skipped,
            "imported package from repository"
        );
        Ok(package)
    }

    /// Import every package config found under `configs/` in the collection repository
    ///
    /// Packages are imported concurrently. A package that fails to import is
    /// left out of the result and its error is recorded in
    /// [`ImportedCollection::failures`].
    pub fn import_collection(&self, collection_url: &Url) -> Result<ImportedCollection> {
        let configs: Vec<Template> = self
            .filtered_templates(&[prefix_filter(CONFIGS_DIR)?])?
            .into_iter()
            .filter(|t| t.is_file)
            .collect();

        if configs.is_empty() {
            return Err(Error::Validation(format!(
                "no configs were found in collection {}",
                collection_url
            )));
        }

        let (tx, rx) = mpsc::channel();
        thread::scope(|scope| {
            for config in &configs {
                let tx = tx.clone();
                scope.spawn(move || {
                    let result = package_url(collection_url, &config.destination)
                        .and_then(|url| self.import_package(&url))
                        .map_err(|e| format!("{}: {}", config.destination, e));
                    let _ = tx.send(result);
                });
            }
        });
        drop(tx);

        let mut collection = ImportedCollection::default();
        for result in rx {
            match result {
                Ok(package) => collection.packages.push(package),
                Err(message) => {
                    tracing::warn!("{}", message);
                    collection.failures.push(message);
                }
            }
        }
        Ok(collection)
    }

    fn package_named_after_repo(&self) -> Package {
        let repo_name = self.importer.repository_name();
        let base_name = repo_name.rsplit('/').next().unwrap_or(repo_name);
        Package::new(base_name, derive_label(base_name), false)
    }

    fn filtered_templates(&self, filters: &[Regex]) -> Result<Vec<Template>> {
        let entries = self.importer.load_tree_entries()?;
        Ok(filter_and_convert(&entries, filters))
    }

    /// Build the download list for a package's templates and plugins
    fn dependency_jobs(&self, package: &Package) -> Result<Vec<FetchJob>> {
        let mut jobs = Vec::new();
        let mut remote_templates: Option<Vec<Template>> = None;

        for template in package.templates.iter().filter(|t| !t.path.is_empty()) {
            // The tree is listed once, and only if some template needs it
            if remote_templates.is_none() {
                remote_templates = Some(self.filtered_templates(&[prefix_filter(TEMPLATES_DIR)?])?);
            }
            let available = remote_templates.as_deref().unwrap_or(&[]);

            if available.is_empty() {
                return Err(Error::Validation(format!(
                    "no templates were found in repository {} but package {} requires templates",
                    self.importer.repository_name(),
                    package.name
                )));
            }

            let mut names_directory = false;
            for entry in available {
                let relative = strip_dir_prefix(&entry.destination, TEMPLATES_DIR);
                // Folder entries are never queued: they have no raw content to download
                if !entry.is_file {
                    names_directory |= relative == template.path.trim_end_matches('/');
                    continue;
                }
                if relative.starts_with(&template.path) {
                    jobs.push(self.download_job(TEMPLATES_DIR, relative));
                }
            }

            // Unlike a literal fetch list, a path naming a folder is not downloaded directly; its files were queued above
            if !names_directory {
                jobs.push(self.download_job(TEMPLATES_DIR, &template.path));
            }
        }

        for plugin in &package.plugins {
            jobs.push(self.download_job(PLUGINS_DIR, &plugin.path).executable());
        }

        jobs.sort();
        jobs.dedup();
        Ok(jobs)
    }

    fn download_job(&self, kind: &str, relative_path: &str) -> FetchJob {
        FetchJob::new(
            self.base_path.join(kind).join(relative_path),
            self.importer
                .file_path_to_raw_uri(&format!("{}/{}", kind, relative_path)),
        )
    }
}

fn strip_dir_prefix<'p>(path: &'p str, dir: &str) -> &'p str {
    path.strip_prefix(dir)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path)
}

fn package_url(collection_url: &Url, relative_path: &str) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        collection_url.as_str().trim_end_matches('/'),
        relative_path
    );
    Ok(Url::parse(&joined)?)
}
