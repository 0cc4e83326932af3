pub mod create;
pub mod export;
pub mod import;
pub mod list;
pub mod project;
pub mod remove;
pub mod show;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use proji::{Config, Store};

/// Loaded configuration plus the store it points to
pub struct Session {
    pub config: Config,
    pub store: Store,
}

impl Session {
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        let store = Store::open(config.storage_path())?;
        Ok(Self { config, store })
    }
}

/// Spinner for network-bound work
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
        spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}
