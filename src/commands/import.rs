use super::{spinner, Session};
use anyhow::{Context, Result};
use proji::fetch::HttpFetcher;
use proji::remote::importer_for_url;
use proji::{Package, RemoteImport};
use url::Url;

/// Everything `proji package import` was asked to import
pub struct ImportSources {
    pub configs: Vec<String>,
    pub directories: Vec<String>,
    pub repos: Vec<String>,
    pub packages: Vec<String>,
    pub collections: Vec<String>,
    pub exclude: Vec<String>,
}

impl ImportSources {
    fn is_empty(&self) -> bool {
        self.configs.is_empty()
            && self.directories.is_empty()
            && self.repos.is_empty()
            && self.packages.is_empty()
            && self.collections.is_empty()
    }
}

pub fn run(sources: ImportSources) -> Result<()> {
    if sources.is_empty() {
        anyhow::bail!(
            "nothing to import\n\n\
             Use --config, --directory, --repo, --package or --collection."
        );
    }

    let mut session = Session::open()?;
    let mut exclude = session.config.import.exclude_folders.clone();
    exclude.extend(sources.exclude.iter().cloned());

    let mut failed = 0;

    for config in &sources.configs {
        let result = Package::from_config(config).map(|p| vec![p]);
        failed += save_all(&mut session, config, result.map_err(Into::into));
    }

    for directory in &sources.directories {
        let result = Package::from_directory(directory, &exclude).map(|p| vec![p]);
        failed += save_all(&mut session, directory, result.map_err(Into::into));
    }

    for repo in &sources.repos {
        let result = import_remote(&session, repo, |remote, _| {
            Ok(vec![remote.import_structure()?])
        });
        failed += save_all(&mut session, repo, result);
    }

    for package in &sources.packages {
        let result = import_remote(&session, package, |remote, url| {
            Ok(vec![remote.import_package(url)?])
        });
        failed += save_all(&mut session, package, result);
    }

    for collection in &sources.collections {
        let mut package_failures = 0;
        let result = import_remote(&session, collection, |remote, url| {
            let imported = remote.import_collection(url)?;
            for failure in &imported.failures {
                println!("✗ {}", failure);
            }
            package_failures = imported.failures.len();
            Ok(imported.packages)
        });
        failed += package_failures + save_all(&mut session, collection, result);
    }

    if failed > 0 {
        anyhow::bail!("{} import{} failed", failed, if failed == 1 { "" } else { "s" });
    }
    Ok(())
}

fn import_remote<F>(session: &Session, source: &str, import: F) -> Result<Vec<Package>>
where
    F: FnOnce(&RemoteImport<'_>, &Url) -> proji::Result<Vec<Package>>,
{
    let url = Url::parse(source).with_context(|| format!("invalid URL {}", source))?;
    let progress = spinner(&format!("Importing {}...", source));

    let importer = importer_for_url(&url);
    let fetcher = HttpFetcher::new();
    let result = importer.and_then(|importer| {
        let fetcher = fetcher?;
        let remote = RemoteImport::new(importer.as_ref(), &fetcher, &session.config.base_path);
        import(&remote, &url)
    });

    progress.finish_and_clear();
    Ok(result?)
}

/// Save imported packages, printing one line per outcome; returns the number of failures
fn save_all(session: &mut Session, source: &str, imported: Result<Vec<Package>>) -> usize {
    let packages = match imported {
        Ok(packages) => packages,
        Err(e) => {
            println!("✗ Import of {} failed: {:#}", source, e);
            return 1;
        }
    };

    let mut failed = 0;
    for package in packages {
        let label = package.label.clone();
        match session.store.save_package(package) {
            Ok(()) => println!("✓ Imported package '{}' from {}", label, source),
            Err(e) => {
                println!("✗ Failed to save package '{}': {}", label, e);
                failed += 1;
            }
        }
    }
    failed
}
