use super::Session;
use anyhow::Result;

pub fn run(labels: Vec<String>) -> Result<()> {
    let mut session = Session::open()?;
    let mut failed = 0;

    for label in &labels {
        match session.store.remove_package(label) {
            Ok(()) => println!("✓ Removed package '{}'", label),
            Err(e) => {
                println!("✗ Failed to remove package '{}': {}", label, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("failed to remove {} of {} packages", failed, labels.len());
    }
    Ok(())
}
