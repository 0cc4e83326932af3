use super::Session;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub fn run(labels: Vec<String>, destination: Option<String>) -> Result<()> {
    let destination = match destination {
        Some(dir) => PathBuf::from(dir),
        None => env::current_dir()?,
    };
    if !destination.is_dir() {
        anyhow::bail!("destination {} is not a directory", destination.display());
    }

    let session = Session::open()?;
    for label in &labels {
        let package = session
            .store
            .load_package(label)
            .with_context(|| format!("failed to load package '{}'", label))?;
        let path = package
            .export_config(&destination)
            .with_context(|| format!("failed to export package '{}'", label))?;
        println!("✓ Exported package '{}' to {}", label, path.display());
    }
    Ok(())
}
