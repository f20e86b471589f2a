//! Shared helpers for the provider clients

use std::time::Duration;

use reqwest::Client;

use crate::error::{ProviderError, Result};

// ============ HTTP Client ============

/// Default connect timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Retries for idempotent requests
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 2;

/// User agent sent to every provider (GitHub rejects requests without one).
pub(crate) const USER_AGENT: &str = concat!("sitedrop/", env!("CARGO_PKG_VERSION"));

/// Creates an HTTP client with the default timeouts.
pub fn create_http_client(provider: &str) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ProviderError::SerializationError {
            provider: provider.to_string(),
            detail: format!("Failed to build HTTP client: {e}"),
        })
}

// ============ Domain names ============

/// Strips a trailing dot.
pub fn normalize_domain_name(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}
