use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid package: {0}")]
    Validation(String),

    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("Platform not supported yet: {0}\n\n\
             Hint: proji can import from github.com and gitlab.com repositories.")]
    PlatformNotSupported(String),

    #[error("OS {0} is not supported and/or tested yet")]
    UnsupportedOs(String),

    #[error("Download of {url} failed: HTTP {status}")]
    Download { url: String, status: u16 },

    #[error("Failed to launch plugin {}: {source}", .plugin.display())]
    PluginLaunch {
        plugin: PathBuf,
        source: std::io::Error,
    },

    #[error("Plugin {} exited with {}", .plugin.display(), exit_description(.code))]
    PluginFailed { plugin: PathBuf, code: Option<i32> },

    #[error("{}", .0.join("\n"))]
    Aggregate(Vec<String>),

    #[error("{0}")]
    Other(String),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl Error {
    /// Individual failure messages of an aggregated error; a single-item list otherwise.
    pub fn failures(&self) -> Vec<String> {
        match self {
            Error::Aggregate(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}
