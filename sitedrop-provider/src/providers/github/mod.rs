//! GitHub source-control host

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::create_http_client;

pub(crate) const GITHUB_API_BASE: &str = "https://api.github.com";
pub(crate) const GITHUB_API_VERSION: &str = "2022-11-28";
/// Maximum page size of the repository listing
pub(crate) const MAX_PAGE_SIZE_REPOS: usize = 100;

/// GitHub REST client acting as one account (`owner`) with a personal access token.
pub struct GithubProvider {
    pub(crate) client: Client,
    pub(crate) token: String,
    pub(crate) owner: String,
    pub(crate) api_base: String,
}

impl GithubProvider {
    pub fn new(token: String, owner: String) -> Result<Self> {
        Ok(Self {
            client: create_http_client("github")?,
            token,
            owner,
            api_base: GITHUB_API_BASE.to_string(),
        })
    }

    /// Points the client at another API root (GitHub Enterprise, test servers).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}
