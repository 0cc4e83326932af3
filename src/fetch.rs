//! Best-effort concurrent downloads
//!
//! Every job runs on its own thread. Destinations that already exist are
//! skipped, so re-running a partially failed import only fetches what is
//! missing. Failures never cancel sibling jobs; they are collected and
//! reported together once every job has finished.
//!
//! # Examples
//!
//! ```no_run
//! use proji::fetch::{fetch_all, FetchJob, HttpFetcher};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = HttpFetcher::new()?;
//! let jobs = vec![FetchJob::new(
//!     "/tmp/proji/README.md",
//!     "https://raw.githubusercontent.com/nikoksr/proji/master/README.md",
//! )];
//! let summary = fetch_all(&fetcher, &jobs)?;
//! println!("fetched {}, skipped {}", summary.fetched, summary.skipped);
//! # Ok(())
//! # }
//! ```

use crate::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use tempfile::NamedTempFile;

/// Something that can copy a source URI to a local file
pub trait Fetch: Send + Sync {
    fn fetch(&self, source: &str, destination: &Path) -> Result<()>;
}

/// Downloads over HTTP(S)
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: crate::remote::http_client()?,
        })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, source: &str, destination: &Path) -> Result<()> {
        let mut response = self.client.get(source).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Download {
                url: source.to_string(),
                status: status.as_u16(),
            });
        }

        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        // Private staging file per download; the destination only appears once complete
        let mut staging = NamedTempFile::new_in(parent)?;
        response.copy_to(staging.as_file_mut())?;
        staging.as_file_mut().flush()?;

        if let Err(e) = staging.persist(destination) {
            // Another fetch finished the same destination first
            if destination.exists() {
                tracing::debug!(destination = %destination.display(), "fetched concurrently");
                return Ok(());
            }
            return Err(e.error.into());
        }
        Ok(())
    }
}

/// One file to download
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchJob {
    pub destination: PathBuf,
    pub source: String,
    /// Mark the downloaded file executable (plugins)
    pub executable: bool,
}

impl FetchJob {
    pub fn new(destination: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            source: source.into(),
            executable: false,
        }
    }

    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }
}

/// Outcome of a successful batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    /// Jobs that were downloaded
    pub fetched: usize,
    /// Jobs whose destination already existed
    pub skipped: usize,
}

enum JobOutcome {
    Fetched,
    Skipped,
}

/// Download a single file unless its destination already exists
///
/// Returns `Ok(false)` when the file was already present.
pub fn fetch_if_missing(fetcher: &dyn Fetch, job: &FetchJob) -> Result<bool> {
    if job.destination.exists() {
        tracing::debug!(destination = %job.destination.display(), "already present, skipping");
        return Ok(false);
    }

    tracing::debug!(source = %job.source, destination = %job.destination.display(), "fetching");
    fetcher.fetch(&job.source, &job.destination)?;

    if job.executable {
        make_executable(&job.destination)?;
    }
    Ok(true)
}

/// Run every job concurrently and wait for all of them
///
/// Returns [`Error::Aggregate`] with one message per failed job if any job
/// failed. Files fetched by the successful jobs stay in place either way.
pub fn fetch_all(fetcher: &dyn Fetch, jobs: &[FetchJob]) -> Result<FetchSummary> {
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        for job in jobs {
            let tx = tx.clone();
            scope.spawn(move || {
                let outcome = match fetch_if_missing(fetcher, job) {
                    Ok(true) => Ok(JobOutcome::Fetched),
                    Ok(false) => Ok(JobOutcome::Skipped),
                    Err(e) => Err(format!("{}: {}", job.source, e)),
                };
                // The receiver outlives the scope, so sending cannot fail
                let _ = tx.send(outcome);
            });
        }
    });
    drop(tx);

    let mut summary = FetchSummary::default();
    let mut failures = Vec::new();
    for outcome in rx {
        match outcome {
            Ok(JobOutcome::Fetched) => summary.fetched += 1,
            Ok(JobOutcome::Skipped) => summary.skipped += 1,
            Err(message) => {
                tracing::warn!("{}", message);
                failures.push(message);
            }
        }
    }

    if failures.is_empty() {
        Ok(summary)
    } else {
        Err(Error::Aggregate(failures))
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    fs::set_permissions(path, permissions)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
