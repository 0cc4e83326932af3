use super::{get_json, http_client, Importer, RepoLocation};
use crate::tree::{EntryKind, TreeEntry};
use crate::Result;
use serde::Deserialize;
use url::Url;

pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const GITHUB_RAW_URL: &str = "https://raw.githubusercontent.com";

/// Importer for repositories hosted on github.com
pub struct GitHub {
    client: reqwest::blocking::Client,
    api_base: String,
    raw_base: String,
    location: RepoLocation,
    full_name: String,
    git_ref: String,
}

#[derive(Debug, Deserialize)]
struct ApiRepository {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct ApiTree {
    tree: Vec<ApiTreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct ApiTreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

impl GitHub {
    /// Create an importer for `repo_url` against the public GitHub endpoints
    ///
    /// When the URL names no branch, the repository's default branch is looked up.
    pub fn new(repo_url: &Url) -> Result<Self> {
        Self::with_endpoints(repo_url, GITHUB_API_URL, GITHUB_RAW_URL)
    }

    /// Create an importer that talks to custom API and raw-content endpoints
    pub fn with_endpoints(repo_url: &Url, api_base: &str, raw_base: &str) -> Result<Self> {
        let location = RepoLocation::parse(repo_url)?;
        let client = http_client()?;
        let api_base = api_base.trim_end_matches('/').to_string();

        let git_ref = match &location.git_ref {
            Some(git_ref) => git_ref.clone(),
            None => {
                let url = format!("{}/repos/{}", api_base, location.full_name());
                get_json::<ApiRepository>(&client, &url)?.default_branch
            }
        };

        Ok(Self {
            client,
            api_base,
            raw_base: raw_base.trim_end_matches('/').to_string(),
            full_name: location.full_name(),
            location,
            git_ref,
        })
    }

    /// Branch, tag or commit the importer reads from
    pub fn git_ref(&self) -> &str {
        &self.git_ref
    }
}

impl Importer for GitHub {
    fn load_tree_entries(&self) -> Result<Vec<TreeEntry>> {
        let url = format!(
            "{}/repos/{}/git/trees/{}?recursive=1",
            self.api_base,
            self.full_name,
            urlencoding::encode(&self.git_ref)
        );
        let tree: ApiTree = get_json(&self.client, &url)?;

        if tree.truncated {
            tracing::warn!(repo = %self.full_name, "GitHub truncated the repository tree listing");
        }
        tracing::debug!(repo = %self.full_name, entries = tree.tree.len(), "loaded tree");

        Ok(tree
            .tree
            .into_iter()
            .map(|entry| TreeEntry::new(entry.path, EntryKind::from_type(&entry.kind)))
            .collect())
    }

    fn file_path_to_raw_uri(&self, relative_path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.raw_base,
            self.location.owner,
            self.location.repo,
            self.git_ref,
            relative_path.trim_start_matches('/')
        )
    }

    fn repository_name(&self) -> &str {
        &self.full_name
    }
}
