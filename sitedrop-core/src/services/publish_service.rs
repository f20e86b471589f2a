//! Publish orchestration
//!
//! Turns an uploaded bundle into a repository, a hosting project with a
//! production deployment, and a custom domain with its DNS record.
//!
//! All local checks (inputs, root domain, key, bundle) and the collision
//! check run before the first provider write. The provisioning itself is a
//! [`Saga`] so a failure names the step that broke and what already exists.

use std::sync::Arc;

use rand::Rng;
use sitedrop_provider::{
    CreateDeploymentRequest, CreateDnsRecordRequest, CreateProjectRequest,
    CreateRepositoryRequest, DnsProvider, DnsRecord, DnsRecordType, FileUpload, ProviderError,
    RecordQueryParams, Result as ProviderResult,
};

use crate::bundle::PreparedBundle;
use crate::error::{CoreError, CoreResult};
use crate::saga::{Compensation, ProvisionStep, Saga};
use crate::services::{ApiKeyService, ServiceContext};
use crate::types::{PublishRequest, SiteRecord, SiteStatus, UploadedBundle};
use crate::utils::{normalize_root_domain, normalize_subdomain};

/// Branch deployed when the host does not report a default one.
const FALLBACK_BRANCH: &str = "main";

/// TTL value meaning "automatic" on the DNS provider.
const AUTO_TTL: u32 = 1;

pub struct PublishService {
    ctx: Arc<ServiceContext>,
    keys: ApiKeyService,
}

impl PublishService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            keys: ApiKeyService::new(Arc::clone(&ctx)),
            ctx,
        }
    }

    /// Publishes a site and returns its descriptor with status `pending`.
    pub async fn publish(&self, request: PublishRequest) -> CoreResult<SiteRecord> {
        let PublishRequest {
            subdomain: raw_subdomain,
            root_domain,
            api_key,
            bundle,
        } = request;

        let root_domain = normalize_root_domain(&root_domain);
        let api_key = api_key.trim();
        let bundle = match bundle {
            Some(b) if !raw_subdomain.trim().is_empty()
                && !root_domain.is_empty()
                && !api_key.is_empty() =>
            {
                b
            }
            _ => {
                return Err(CoreError::ValidationError(
                    "subdomain, rootDomain, apiKey and websiteFile are all required".to_string(),
                ));
            }
        };
        let subdomain = normalize_subdomain(&raw_subdomain);
        if subdomain.is_empty() {
            return Err(CoreError::ValidationError(format!(
                "Subdomain '{raw_subdomain}' contains no usable characters"
            )));
        }

        let (domain_config, dns) = self.ctx.dns_for(&root_domain).await?;
        self.keys.verify_key(api_key).await?;

        let (prepared, files) = self.prepare_bundle(bundle).await?;
        let fqdn = format!("{subdomain}.{root_domain}");

        if let Some(what) = self
            .ctx
            .find_collision(&subdomain, &fqdn, &domain_config.zone_id, dns.as_ref())
            .await?
        {
            log::warn!("Refusing to publish {fqdn}: {what} already exists");
            return Err(CoreError::SubdomainTaken(fqdn));
        }

        log::info!(
            "Publishing {fqdn} ({} files from {})",
            files.len(),
            prepared.root().display()
        );
        let record = self
            .provision(&subdomain, &fqdn, &domain_config.zone_id, dns.as_ref(), &files)
            .await?;
        log::info!("Published {fqdn} as {}", record.github_repo);
        Ok(record)
    }

    /// Expands the upload off the executor.
    async fn prepare_bundle(
        &self,
        bundle: UploadedBundle,
    ) -> CoreResult<(PreparedBundle, Vec<FileUpload>)> {
        let scratch_dir = self.ctx.settings.scratch_dir.clone();
        let limits = self.ctx.settings.bundle_limits();

        tokio::task::spawn_blocking(move || {
            let prepared = PreparedBundle::prepare(&bundle, &scratch_dir, limits)?;
            let files = prepared.files()?;
            Ok((prepared, files))
        })
        .await
        .map_err(|e| CoreError::StorageError(format!("Bundle preparation aborted: {e}")))?
    }

    async fn provision(
        &self,
        subdomain: &str,
        fqdn: &str,
        zone_id: &str,
        dns: &dyn DnsProvider,
        files: &[FileUpload],
    ) -> CoreResult<SiteRecord> {
        let settings = &self.ctx.settings;
        let source_control = self.ctx.source_control.as_ref();
        let hosting = self.ctx.hosting.as_ref();
        let mut saga = Saga::new(source_control, hosting, settings.rollback_on_failure);

        let suffix: u16 = rand::rng().random_range(100..=999);
        let repo = saga
            .step(
                ProvisionStep::CreateRepository,
                source_control.create_repository(&CreateRepositoryRequest {
                    name: format!("{subdomain}-{suffix}"),
                    private: true,
                    description: Some(format!("Static site for {fqdn}")),
                }),
            )
            .await?;
        saga.record(Compensation::DeleteRepository {
            name: repo.name.clone(),
        });

        saga.step(
            ProvisionStep::UploadFiles,
            source_control.upload_files(&repo.name, files, &settings.commit_message),
        )
        .await?;

        let project = saga
            .step(
                ProvisionStep::CreateProject,
                hosting.create_project(&CreateProjectRequest {
                    name: subdomain.to_string(),
                    repository: repo.full_name.clone(),
                    framework: None,
                }),
            )
            .await?;
        saga.record(Compensation::DeleteProject {
            name: project.name.clone(),
        });

        let repo_id = project
            .link
            .as_ref()
            .and_then(|l| l.repo_id)
            .unwrap_or(repo.id);
        let deployment = saga
            .step(
                ProvisionStep::TriggerDeployment,
                hosting.create_deployment(&CreateDeploymentRequest {
                    project: project.name.clone(),
                    repo_id,
                    git_ref: repo
                        .default_branch
                        .clone()
                        .unwrap_or_else(|| FALLBACK_BRANCH.to_string()),
                    production: true,
                }),
            )
            .await?;
        log::debug!("Deployment {} queued for {}", deployment.id, project.name);

        saga.step(ProvisionStep::AttachDomain, hosting.add_domain(&project.name, fqdn))
            .await?;

        let record = saga
            .step(
                ProvisionStep::ReconcileDns,
                self.reconcile_dns(dns, zone_id, subdomain, fqdn),
            )
            .await?;
        log::debug!("DNS record {} points {fqdn} at {}", record.id, record.content);

        Ok(SiteRecord {
            project_name: project.name.clone(),
            github_repo: repo.full_name,
            vercel_url: hosting.default_url(&project.name),
            custom_url: format!("https://{fqdn}"),
            status: SiteStatus::Pending,
        })
    }

    /// Replaces whatever answers for `fqdn` with an `A` record to the edge.
    async fn reconcile_dns(
        &self,
        dns: &dyn DnsProvider,
        zone_id: &str,
        subdomain: &str,
        fqdn: &str,
    ) -> ProviderResult<DnsRecord> {
        let existing = dns
            .list_records(zone_id, &RecordQueryParams::by_name(fqdn))
            .await?;

        if !existing.is_empty() {
            let ids: Vec<String> = existing.into_iter().map(|r| r.id).collect();
            log::info!("Removing {} existing records at {fqdn}", ids.len());
            let result = dns.batch_delete_records(zone_id, &ids).await?;
            if result.failed_count > 0 {
                let reasons: Vec<String> = result
                    .failures
                    .iter()
                    .map(|f| format!("{}: {}", f.record_id, f.reason))
                    .collect();
                return Err(ProviderError::Unknown {
                    provider: dns.id().to_string(),
                    raw_code: None,
                    raw_message: format!(
                        "Failed to remove existing records at {fqdn}: {}",
                        reasons.join("; ")
                    ),
                });
            }
        }

        dns.create_record(&CreateDnsRecordRequest {
            zone_id: zone_id.to_string(),
            name: subdomain.to_string(),
            record_type: DnsRecordType::A,
            content: self.ctx.settings.edge_address.clone(),
            ttl: AUTO_TTL,
            proxied: Some(false),
        })
        .await
    }
}
