//! Hosting project and repository management

use std::sync::Arc;

use sitedrop_provider::{HostingProject, ProviderError};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{
    Availability, DomainStatusReport, ProjectSummary, RepositorySummary, SiteStatus,
};
use crate::utils::{normalize_root_domain, normalize_subdomain};

/// Admin-side view of the generated projects and repositories.
pub struct ProjectService {
    ctx: Arc<ServiceContext>,
}

impl ProjectService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Hosting projects with their linked repository and default URL.
    pub async fn list_projects(&self) -> CoreResult<Vec<ProjectSummary>> {
        let projects = self.ctx.hosting.list_projects().await?;
        Ok(projects
            .into_iter()
            .map(|p| self.summarize(p))
            .collect())
    }

    /// Deletes a hosting project, then the repository it was built from.
    ///
    /// If the project goes but the repository cannot be removed the result is
    /// [`CoreError::PartialFailure`].
    pub async fn delete_project(&self, name: &str) -> CoreResult<()> {
        let name = require_name(name, "Project name")?;
        let project = self
            .ctx
            .hosting
            .get_project(name)
            .await?
            .ok_or_else(|| CoreError::ProjectNotFound(name.to_string()))?;

        self.ctx.hosting.delete_project(name).await?;
        log::info!("Deleted hosting project '{name}'");

        let Some(repo) = project.link.and_then(|l| l.repo) else {
            log::warn!("Project '{name}' has no linked repository");
            return Ok(());
        };

        match self.ctx.source_control.delete_repository(&repo).await {
            Ok(()) => {
                log::info!("Deleted repository '{repo}'");
                Ok(())
            }
            Err(ProviderError::NotFound { .. }) => {
                log::warn!("Repository '{repo}' of project '{name}' was already gone");
                Ok(())
            }
            Err(source) => Err(CoreError::PartialFailure {
                removed: vec![format!("project {name}")],
                failed: format!("repository {repo}"),
                source,
            }),
        }
    }

    /// Deletes only the hosting project.
    pub async fn delete_hosting_project(&self, name: &str) -> CoreResult<()> {
        let name = require_name(name, "Project name")?;
        self.ctx
            .hosting
            .delete_project(name)
            .await
            .map_err(|e| not_found_as(e, || CoreError::ProjectNotFound(name.to_string())))?;
        log::info!("Deleted hosting project '{name}'");
        Ok(())
    }

    pub async fn list_repositories(&self) -> CoreResult<Vec<RepositorySummary>> {
        let repos = self.ctx.source_control.list_repositories().await?;
        Ok(repos
            .into_iter()
            .map(|r| RepositorySummary {
                name: r.name,
                full_name: r.full_name,
                url: r.html_url,
                private: r.private,
            })
            .collect())
    }

    pub async fn delete_repository(&self, name: &str) -> CoreResult<()> {
        let name = require_name(name, "Repository name")?;
        self.ctx
            .source_control
            .delete_repository(name)
            .await
            .map_err(|e| not_found_as(e, || CoreError::ProjectNotFound(name.to_string())))?;
        log::info!("Deleted repository '{name}'");
        Ok(())
    }

    /// Whether `subdomain` under `root_domain` is free for a new site.
    ///
    /// "Taken" is a normal answer; only unknown domains and provider failures
    /// are errors.
    pub async fn check_availability(
        &self,
        subdomain: &str,
        root_domain: &str,
    ) -> CoreResult<Availability> {
        let subdomain = normalize_subdomain(subdomain);
        let root_domain = normalize_root_domain(root_domain);
        if subdomain.is_empty() || root_domain.is_empty() {
            return Err(CoreError::ValidationError(
                "Subdomain and root domain are required".to_string(),
            ));
        }

        let (config, dns) = self.ctx.dns_for(&root_domain).await?;
        let fqdn = format!("{subdomain}.{root_domain}");

        let collision = self
            .ctx
            .probe(self.ctx.hosting.id(), async {
                Ok(self
                    .ctx
                    .find_collision(&subdomain, &fqdn, &config.zone_id, dns.as_ref())
                    .await?)
            })
            .await?;

        if let Some(what) = &collision {
            log::debug!("'{fqdn}' unavailable: {what} exists");
        }
        Ok(Availability {
            available: collision.is_none(),
        })
    }

    /// Point-in-time configuration check of a custom domain.
    pub async fn domain_status(&self, domain: &str) -> CoreResult<DomainStatusReport> {
        let domain = normalize_root_domain(domain);
        if domain.is_empty() {
            return Err(CoreError::ValidationError("Domain is required".to_string()));
        }

        let config = self
            .ctx
            .probe(self.ctx.hosting.id(), async {
                Ok(self.ctx.hosting.domain_config(&domain).await?)
            })
            .await?;

        let (status, message) = if config.misconfigured {
            (
                SiteStatus::Pending,
                format!("{domain} is not pointing at the hosting platform yet"),
            )
        } else {
            (SiteStatus::Success, format!("{domain} is live"))
        };

        Ok(DomainStatusReport {
            domain,
            status,
            message,
        })
    }

    fn summarize(&self, project: HostingProject) -> ProjectSummary {
        ProjectSummary {
            url: self.ctx.hosting.default_url(&project.name),
            repository: project.link.as_ref().and_then(|l| l.full_name()),
            id: project.id,
            name: project.name,
            created_at: project.created_at,
        }
    }
}

fn require_name<'a>(name: &'a str, what: &str) -> CoreResult<&'a str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::ValidationError(format!("{what} is required")));
    }
    Ok(name)
}

fn not_found_as(error: ProviderError, not_found: impl FnOnce() -> CoreError) -> CoreError {
    match error {
        ProviderError::NotFound { .. } => not_found(),
        other => CoreError::Provider(other),
    }
}
