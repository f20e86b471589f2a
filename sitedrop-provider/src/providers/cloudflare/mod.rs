//! Cloudflare DNS provider

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::create_http_client;

pub(crate) use types::{CloudflareDnsRecord, CloudflareResponse};

pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
/// Maximum page size of the DNS records API
pub(crate) const MAX_PAGE_SIZE_RECORDS: u32 = 100;

/// Cloudflare DNS provider, authenticated with a zone-scoped API token.
pub struct CloudflareProvider {
    pub(crate) client: Client,
    pub(crate) api_token: String,
    pub(crate) api_base: String,
}

impl CloudflareProvider {
    pub fn new(api_token: String) -> Result<Self> {
        Ok(Self {
            client: create_http_client("cloudflare")?,
            api_token,
            api_base: CF_API_BASE.to_string(),
        })
    }

    /// Points the client at another API root (proxies, test servers).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}
