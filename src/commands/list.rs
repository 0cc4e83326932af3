use super::Session;
use anyhow::Result;

pub fn run() -> Result<()> {
    let session = Session::open()?;
    let packages = session.store.load_packages(&[])?;

    if packages.is_empty() {
        println!("No packages found.");
        println!();
        println!("Import packages with: proji package import --config <file>");
        return Ok(());
    }

    let width = packages
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    println!("{:<width$}  Label", "Name", width = width);
    for package in &packages {
        println!("{:<width$}  {}", package.name, package.label, width = width);
    }
    println!();
    println!(
        "Total: {} package{}",
        packages.len(),
        if packages.len() == 1 { "" } else { "s" }
    );

    Ok(())
}
