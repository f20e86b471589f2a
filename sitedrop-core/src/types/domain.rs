//! Root domain registry types

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sitedrop_provider::mask_secret;

use crate::error::{CoreError, CoreResult};
use crate::utils::normalize_root_domain;

/// DNS zone credentials of one root domain.
///
/// File format: `{"zone": "<zone id>", "apitoken": "<token>"}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
    #[serde(rename = "zone")]
    pub zone_id: String,
    #[serde(rename = "apitoken")]
    pub api_token: String,
}

impl fmt::Debug for DomainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainConfig")
            .field("zone_id", &self.zone_id)
            .field("api_token", &mask_secret(&self.api_token))
            .finish()
    }
}

/// Immutable mapping from root domain to zone credentials, loaded at start-up.
#[derive(Debug, Clone, Default)]
pub struct DomainRegistry {
    domains: BTreeMap<String, DomainConfig>,
}

impl DomainRegistry {
    /// Builds a registry, normalizing the root-domain keys.
    #[must_use]
    pub fn new(domains: impl IntoIterator<Item = (String, DomainConfig)>) -> Self {
        Self {
            domains: domains
                .into_iter()
                .map(|(name, config)| (normalize_root_domain(&name), config))
                .collect(),
        }
    }

    /// Parses the `{"example.com": {"zone": ..., "apitoken": ...}}` document.
    pub fn from_json(raw: &str) -> CoreResult<Self> {
        let domains: BTreeMap<String, DomainConfig> = serde_json::from_str(raw)
            .map_err(|e| CoreError::SerializationError(format!("Invalid domains file: {e}")))?;

        for (name, config) in &domains {
            if config.zone_id.trim().is_empty() || config.api_token.trim().is_empty() {
                return Err(CoreError::ValidationError(format!(
                    "Domain '{name}' needs both a zone and an apitoken"
                )));
            }
        }

        Ok(Self::new(domains))
    }

    /// Zone credentials of `root_domain`, if configured.
    #[must_use]
    pub fn get(&self, root_domain: &str) -> Option<&DomainConfig> {
        self.domains.get(&normalize_root_domain(root_domain))
    }

    /// Like [`get`](Self::get), failing with [`CoreError::DomainNotConfigured`].
    pub fn require(&self, root_domain: &str) -> CoreResult<&DomainConfig> {
        self.get(root_domain)
            .ok_or_else(|| CoreError::DomainNotConfigured(root_domain.to_string()))
    }

    /// Configured root domains, sorted.
    #[must_use]
    pub fn root_domains(&self) -> Vec<String> {
        self.domains.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DomainConfig)> {
        self.domains.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
