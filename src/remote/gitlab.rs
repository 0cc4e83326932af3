use super::{get_json, http_client, Importer, RepoLocation};
use crate::tree::{EntryKind, TreeEntry};
use crate::{Error, Result};
use serde::Deserialize;
use url::Url;

pub const GITLAB_API_URL: &str = "https://gitlab.com/api/v4";
pub const GITLAB_WEB_URL: &str = "https://gitlab.com";

const PAGE_SIZE: u32 = 100;

/// Importer for repositories hosted on gitlab.com
pub struct GitLab {
    client: reqwest::blocking::Client,
    api_base: String,
    web_base: String,
    full_name: String,
    git_ref: String,
}

#[derive(Debug, Deserialize)]
struct ApiProject {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct ApiTreeNode {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

impl GitLab {
    /// Create an importer for `repo_url` against gitlab.com
    pub fn new(repo_url: &Url) -> Result<Self> {
        Self::with_endpoints(repo_url, GITLAB_API_URL, GITLAB_WEB_URL)
    }

    /// Create an importer that talks to a custom API and web endpoint
    pub fn with_endpoints(repo_url: &Url, api_base: &str, web_base: &str) -> Result<Self> {
        let location = RepoLocation::parse(repo_url)?;
        let client = http_client()?;
        let api_base = api_base.trim_end_matches('/').to_string();
        let full_name = location.full_name();

        let git_ref = match location.git_ref {
            Some(git_ref) => git_ref,
            None => {
                let url = format!("{}/projects/{}", api_base, urlencoding::encode(&full_name));
                get_json::<ApiProject>(&client, &url)?.default_branch
            }
        };

        Ok(Self {
            client,
            api_base,
            web_base: web_base.trim_end_matches('/').to_string(),
            full_name,
            git_ref,
        })
    }

    /// Branch, tag or commit the importer reads from
    pub fn git_ref(&self) -> &str {
        &self.git_ref
    }

    fn tree_page_url(&self, page: u32) -> String {
        format!(
            "{}/projects/{}/repository/tree?recursive=true&per_page={}&ref={}&page={}",
            self.api_base,
            urlencoding::encode(&self.full_name),
            PAGE_SIZE,
            urlencoding::encode(&self.git_ref),
            page
        )
    }
}

impl Importer for GitLab {
    fn load_tree_entries(&self) -> Result<Vec<TreeEntry>> {
        let mut entries = Vec::new();
        let mut page = 1;

        loop {
            let url = self.tree_page_url(page);
            let response = self.client.get(&url).send()?;
            let status = response.status();
            if !status.is_success() {
                return Err(Error::Download {
                    url,
                    status: status.as_u16(),
                });
            }

            let next_page = response
                .headers()
                .get("x-next-page")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u32>().ok());

            let nodes: Vec<ApiTreeNode> = response.json()?;
            entries.extend(
                nodes
                    .into_iter()
                    .map(|node| TreeEntry::new(node.path, EntryKind::from_type(&node.kind))),
            );

            match next_page {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        tracing::debug!(repo = %self.full_name, entries = entries.len(), "loaded tree");
        Ok(entries)
    }

    fn file_path_to_raw_uri(&self, relative_path: &str) -> String {
        format!(
            "{}/{}/-/raw/{}/{}",
            self.web_base,
            self.full_name,
            self.git_ref,
            relative_path.trim_start_matches('/')
        )
    }

    fn repository_name(&self) -> &str {
        &self.full_name
    }
}
