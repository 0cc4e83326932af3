use super::Session;
use anyhow::{Context, Result};
use proji::Project;
use std::path::{Path, PathBuf};

fn absolute(path: &str) -> Result<PathBuf> {
    let path = Path::new(path);
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

pub fn run_add(label: String, path: String) -> Result<()> {
    let path = absolute(&path)?;
    if !path.exists() {
        anyhow::bail!("path {} does not exist", path.display());
    }

    let mut session = Session::open()?;
    let package = session
        .store
        .load_package(&label.to_lowercase())
        .context("failed to load package")?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    session
        .store
        .save_project(Project::new(name, &path, package.label))
        .context("failed to add project")?;

    println!("✓ Added project at {}", path.display());
    Ok(())
}

pub fn run_list() -> Result<()> {
    let session = Session::open()?;
    let projects = session.store.load_projects();

    if projects.is_empty() {
        println!("No projects found.");
        println!();
        println!("Create one with: proji project create <label> <name>");
        return Ok(());
    }

    for project in &projects {
        println!(
            "{}  [{}]  {}",
            project.name,
            project.package,
            project.path.display()
        );
    }
    Ok(())
}

pub fn run_remove(paths: Vec<String>) -> Result<()> {
    let mut session = Session::open()?;
    let mut failed = 0;

    for path in &paths {
        let path = absolute(path)?;
        match session.store.remove_project(&path) {
            Ok(()) => println!("✓ Removed project at {}", path.display()),
            Err(e) => {
                println!("✗ Failed to remove project at {}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("failed to remove {} of {} projects", failed, paths.len());
    }
    Ok(())
}

pub fn run_set_path(old_path: String, new_path: String) -> Result<()> {
    let old_path = absolute(&old_path)?;
    let new_path = absolute(&new_path)?;

    let mut session = Session::open()?;
    session
        .store
        .update_project_location(&old_path, &new_path)
        .context("failed setting project path")?;

    println!(
        "✓ Set path of project at {} to {}",
        old_path.display(),
        new_path.display()
    );
    Ok(())
}
