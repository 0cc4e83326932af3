//! Remote repository importers
//!
//! An [`Importer`] lists the tree of a hosted repository and resolves paths in
//! that tree to raw download URLs. The importer is picked from the URL's
//! hostname:
//!
//! ```no_run
//! use proji::remote::importer_for_url;
//! use url::Url;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let url = Url::parse("https://github.com/nikoksr/proji-official-collection")?;
//! let importer = importer_for_url(&url)?;
//! let entries = importer.load_tree_entries()?;
//! println!("{} has {} entries", importer.repository_name(), entries.len());
//! # Ok(())
//! # }
//! ```

pub mod github;
pub mod gitlab;

pub use github::GitHub;
pub use gitlab::GitLab;

use crate::tree::TreeEntry;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use url::Url;

/// Capability to read a remote repository's tree
pub trait Importer: Send + Sync {
    /// List every entry of the repository tree
    fn load_tree_entries(&self) -> Result<Vec<TreeEntry>>;

    /// Resolve a repository-relative file path to a raw content URL
    fn file_path_to_raw_uri(&self, relative_path: &str) -> String;

    /// Logical repository name, e.g. `owner/repo`
    fn repository_name(&self) -> &str;
}

/// Pick an importer for the code hosting platform of `repo_url`
pub fn importer_for_url(repo_url: &Url) -> Result<Box<dyn Importer>> {
    match repo_url.host_str() {
        Some("github.com") => Ok(Box::new(GitHub::new(repo_url)?)),
        Some("gitlab.com") => Ok(Box::new(GitLab::new(repo_url)?)),
        Some(host) => Err(Error::PlatformNotSupported(host.to_string())),
        None => Err(Error::PlatformNotSupported(repo_url.to_string())),
    }
}

/// HTTP client shared by the importers and the fetcher
pub(crate) fn http_client() -> Result<reqwest::blocking::Client> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("proji/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// GET `url` and decode the JSON body, mapping error statuses to [`Error`]
pub(crate) fn get_json<T: DeserializeOwned>(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<T> {
    let response = client.get(url).send()?;
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(Error::Other(format!(
            "{} was not found. Check that the repository exists and is public.",
            url
        )));
    }
    if !status.is_success() {
        return Err(Error::Download {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.json()?)
}

/// Owner, repository and optional git ref parsed from a repository URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RepoLocation {
    pub owner: String,
    pub repo: String,
    pub git_ref: Option<String>,
}

impl RepoLocation {
    /// Parse `/<owner>/<repo>[/-]/(tree|blob)/<ref>/...` style paths
    pub fn parse(repo_url: &Url) -> Result<Self> {
        let segments: Vec<&str> = repo_url
            .path_segments()
            .map(|s| s.filter(|segment| !segment.is_empty()).collect())
            .unwrap_or_default();

        if segments.len() < 2 {
            return Err(Error::Other(format!(
                "URL {} does not point to a repository (expected /<owner>/<repo>)",
                repo_url
            )));
        }

        let repo = segments[1].trim_end_matches(".git").to_string();
        let rest: Vec<&str> = segments[2..]
            .iter()
            .copied()
            .skip_while(|segment| *segment == "-")
            .collect();
        let git_ref = match rest.as_slice() {
            [kind, git_ref, ..] if *kind == "tree" || *kind == "blob" => Some(git_ref.to_string()),
            _ => None,
        };

        Ok(Self {
            owner: segments[0].to_string(),
            repo,
            git_ref,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_repo_url() {
        let url = Url::parse("https://github.com/nikoksr/proji").unwrap();
        let location = RepoLocation::parse(&url).unwrap();
        assert_eq!(location.owner, "nikoksr");
        assert_eq!(location.repo, "proji");
        assert_eq!(location.git_ref, None);
        assert_eq!(location.full_name(), "nikoksr/proji");
    }

    #[test]
    fn test_parse_ref_from_tree_and_blob_urls() {
        let url = Url::parse("https://github.com/o/r/tree/develop/configs").unwrap();
        assert_eq!(
            RepoLocation::parse(&url).unwrap().git_ref.as_deref(),
            Some("develop")
        );

        let url = Url::parse("https://gitlab.com/o/r/-/blob/main/configs/py.toml").unwrap();
        assert_eq!(RepoLocation::parse(&url).unwrap().git_ref.as_deref(), Some("main"));
    }

    #[test]
    fn test_collection_file_url_has_no_ref() {
        let url = Url::parse("https://github.com/o/r.git/configs/python.toml").unwrap();
        let location = RepoLocation::parse(&url).unwrap();
        assert_eq!(location.repo, "r");
        assert_eq!(location.git_ref, None);
    }

    #[test]
    fn test_parse_rejects_short_paths() {
        let url = Url::parse("https://github.com/nikoksr").unwrap();
        assert!(RepoLocation::parse(&url).is_err());
    }

    #[test]
    fn test_unsupported_host() {
        let url = Url::parse("https://bitbucket.org/o/r").unwrap();
        assert!(matches!(
            importer_for_url(&url),
            Err(Error::PlatformNotSupported(_))
        ));
    }
}
