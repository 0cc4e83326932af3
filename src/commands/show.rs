use super::Session;
use anyhow::{Context, Result};
use proji::Package;

pub fn run(labels: Vec<String>, all: bool) -> Result<()> {
    if !all && labels.is_empty() {
        anyhow::bail!("missing package label");
    }

    let session = Session::open()?;
    let labels = if all { Vec::new() } else { labels };
    let packages = session
        .store
        .load_packages(&labels)
        .context("failed to load packages")?;

    for package in &packages {
        show_package(package);
    }
    Ok(())
}

fn show_package(package: &Package) {
    println!();
    println!("Name:        {}", package.name);
    println!("Label:       {}", package.label);
    println!(
        "Description: {}",
        package.description.as_deref().unwrap_or("-")
    );
    println!();

    if !package.templates.is_empty() {
        println!("Templates:");
        for template in &package.templates {
            let kind = if template.is_file { "file" } else { "folder" };
            let source = if template.path.is_empty() {
                String::new()
            } else {
                format!(" <- {}", template.path)
            };
            println!("  [{}] {}{}", kind, template.destination, source);
            if let Some(description) = &template.description {
                println!("         {}", description);
            }
        }
        println!();
    }

    if !package.plugins.is_empty() {
        println!("Plugins:");
        for plugin in &package.plugins {
            println!("  {:>4}  {}", plugin.exec_number, plugin.path);
            if let Some(description) = &plugin.description {
                println!("        {}", description);
            }
        }
        println!();
    }
}
