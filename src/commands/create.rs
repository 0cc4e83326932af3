use super::Session;
use anyhow::{Context, Result};
use proji::Project;
use std::env;

pub fn run(label: String, names: Vec<String>) -> Result<()> {
    let mut session = Session::open()?;
    let package = session
        .store
        .load_package(&label.to_lowercase())
        .context("failed to load package")?;
    let cwd = env::current_dir()?;

    let mut failed = 0;
    for name in &names {
        println!("Creating project '{}'...", name);
        let project = Project::new(name.as_str(), cwd.join(name), package.label.as_str());

        if let Err(e) = project.create(&package, &session.config.base_path) {
            println!("✗ Failed to create project '{}': {}", name, e);
            failed += 1;
            continue;
        }

        match session.store.save_project(project) {
            Ok(()) => println!("✓ Created project '{}'", name),
            Err(e) => {
                println!("⚠ Created project '{}' but failed to record it: {}", name, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("failed to create {} of {} projects", failed, names.len());
    }
    Ok(())
}
