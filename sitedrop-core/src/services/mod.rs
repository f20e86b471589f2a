//! Business logic service layer

mod admin_service;
mod api_key_service;
mod project_service;
mod publish_service;

pub use admin_service::AdminService;
pub use api_key_service::ApiKeyService;
pub use project_service::ProjectService;
pub use publish_service::PublishService;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sitedrop_provider::{
    DnsProvider, HostingPlatform, RecordQueryParams, Result as ProviderResult, SourceControlHost,
};

use crate::bundle::BundleLimits;
use crate::error::{CoreError, CoreResult};
use crate::traits::{ApiKeyStore, ProviderRegistry};
use crate::types::{DomainConfig, DomainRegistry};

/// Upload limit applied when nothing else is configured (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Cap on the expanded size of an uploaded archive (100 MiB).
pub const DEFAULT_MAX_EXTRACTED_BYTES: u64 = 100 * 1024 * 1024;

/// Address of the hosting platform's edge, target of the site `A` record.
pub const DEFAULT_EDGE_ADDRESS: &str = "76.76.21.21";

/// Tunables of publishing and the status probes.
#[derive(Debug, Clone)]
pub struct PublishSettings {
    pub max_upload_bytes: u64,
    pub max_extracted_bytes: u64,
    /// Parent of the per-request scratch directories
    pub scratch_dir: PathBuf,
    pub edge_address: String,
    /// Undo completed steps when a later publish step fails
    pub rollback_on_failure: bool,
    /// Upper bound for availability and domain status checks
    pub probe_timeout: Duration,
    /// Read-modify-write attempts on the key document
    pub key_write_attempts: u32,
    pub commit_message: String,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_extracted_bytes: DEFAULT_MAX_EXTRACTED_BYTES,
            scratch_dir: std::env::temp_dir(),
            edge_address: DEFAULT_EDGE_ADDRESS.to_string(),
            rollback_on_failure: false,
            probe_timeout: Duration::from_secs(8),
            key_write_attempts: 3,
            commit_message: "Initial commit".to_string(),
        }
    }
}

impl PublishSettings {
    #[must_use]
    pub fn bundle_limits(&self) -> BundleLimits {
        BundleLimits {
            max_upload_bytes: self.max_upload_bytes,
            max_extracted_bytes: self.max_extracted_bytes,
        }
    }
}

/// Service context holding every dependency.
///
/// The platform layer builds it once at start-up and injects the concrete
/// provider clients and storage implementations.
pub struct ServiceContext {
    pub source_control: Arc<dyn SourceControlHost>,
    pub hosting: Arc<dyn HostingPlatform>,
    /// DNS client per root domain
    pub provider_registry: Arc<dyn ProviderRegistry>,
    pub domain_registry: Arc<DomainRegistry>,
    pub key_store: Arc<dyn ApiKeyStore>,
    pub settings: PublishSettings,
}

impl ServiceContext {
    #[must_use]
    pub fn new(
        source_control: Arc<dyn SourceControlHost>,
        hosting: Arc<dyn HostingPlatform>,
        provider_registry: Arc<dyn ProviderRegistry>,
        domain_registry: Arc<DomainRegistry>,
        key_store: Arc<dyn ApiKeyStore>,
        settings: PublishSettings,
    ) -> Self {
        Self {
            source_control,
            hosting,
            provider_registry,
            domain_registry,
            key_store,
            settings,
        }
    }

    /// Zone credentials and DNS client of a configured root domain.
    pub async fn dns_for(
        &self,
        root_domain: &str,
    ) -> CoreResult<(&DomainConfig, Arc<dyn DnsProvider>)> {
        let config = self.domain_registry.require(root_domain)?;
        let provider = self
            .provider_registry
            .get(root_domain)
            .await
            .ok_or_else(|| CoreError::DomainNotConfigured(root_domain.to_string()))?;
        Ok((config, provider))
    }

    /// Runs a status probe under the configured timeout.
    pub async fn probe<T, F>(&self, provider: &str, action: F) -> CoreResult<T>
    where
        F: Future<Output = CoreResult<T>>,
    {
        let limit = self.settings.probe_timeout;
        tokio::time::timeout(limit, action).await.unwrap_or_else(|_| {
            log::warn!("{provider} did not answer within {}s", limit.as_secs());
            Err(CoreError::ProviderUnresponsive {
                provider: provider.to_string(),
                seconds: limit.as_secs(),
            })
        })
    }

    /// What already claims `project` or `fqdn`, if anything.
    ///
    /// A project with the same name counts as taken, as does a custom domain the
    /// hosting platform already serves for some other project, or any record at
    /// the custom domain that does not point at the hosting edge. Leftover edge
    /// records from a removed site are reclaimed by DNS reconciliation.
    pub(crate) async fn find_collision(
        &self,
        project: &str,
        fqdn: &str,
        zone_id: &str,
        dns: &dyn DnsProvider,
    ) -> ProviderResult<Option<String>> {
        if self.hosting.get_project(project).await?.is_some() {
            return Ok(Some(format!("project '{project}'")));
        }
        if let Some(owner) = self.hosting.domain_project(fqdn).await? {
            return Ok(Some(format!("domain '{fqdn}' (attached to '{owner}')")));
        }
        let records = dns
            .list_records(zone_id, &RecordQueryParams::by_name(fqdn))
            .await?;
        if records
            .iter()
            .any(|r| r.content != self.settings.edge_address)
        {
            return Ok(Some(format!("domain '{fqdn}'")));
        }
        Ok(None)
    }
}
