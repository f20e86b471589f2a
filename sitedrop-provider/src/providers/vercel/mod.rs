//! Vercel hosting platform

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::create_http_client;

pub(crate) const VERCEL_API_BASE: &str = "https://api.vercel.com";
/// Maximum page size of the project listing
pub(crate) const MAX_PAGE_SIZE_PROJECTS: u32 = 100;

/// Vercel REST client; every call is scoped to `team_id` when one is set.
pub struct VercelProvider {
    pub(crate) client: Client,
    pub(crate) token: String,
    pub(crate) team_id: Option<String>,
    pub(crate) api_base: String,
}

impl VercelProvider {
    pub fn new(token: String, team_id: Option<String>) -> Result<Self> {
        Ok(Self {
            client: create_http_client("vercel")?,
            token,
            team_id: team_id.filter(|t| !t.trim().is_empty()),
            api_base: VERCEL_API_BASE.to_string(),
        })
    }

    /// Points the client at another API root (test servers).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}
