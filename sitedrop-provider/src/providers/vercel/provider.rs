//! Vercel `HostingPlatform` implementation

use async_trait::async_trait;
use reqwest::Method;

use crate::error::{ProviderError, Result};
use crate::traits::{ErrorContext, HostingPlatform};
use crate::types::{
    CreateDeploymentRequest, CreateProjectRequest, Deployment, DomainConfiguration,
    HostingProject, ProjectDomain,
};

use super::http::NO_BODY;
use super::types::{
    VercelAddDomain, VercelAlias, VercelCreateDeployment, VercelCreateProject, VercelDeployment,
    VercelDomainConfig, VercelGitRepository, VercelGitSource, VercelProject, VercelProjectDomain,
    VercelProjectList,
};
use super::{MAX_PAGE_SIZE_PROJECTS, VercelProvider};

#[async_trait]
impl HostingPlatform for VercelProvider {
    fn id(&self) -> &'static str {
        "vercel"
    }

    async fn create_project(&self, req: &CreateProjectRequest) -> Result<HostingProject> {
        let body = VercelCreateProject {
            name: &req.name,
            git_repository: VercelGitRepository {
                kind: "github",
                repo: &req.repository,
            },
            framework: req.framework.as_deref(),
        };
        let project: VercelProject = self
            .execute_json(
                Method::POST,
                "/v11/projects",
                &[],
                Some(&body),
                ErrorContext::resource(&req.name),
            )
            .await?;
        log::info!("[vercel] Created project {} ({})", project.name, project.id);
        Ok(project.into())
    }

    async fn get_project(&self, name: &str) -> Result<Option<HostingProject>> {
        let result: Result<VercelProject> = self
            .execute_json(
                Method::GET,
                &format!("/v9/projects/{}", urlencoding::encode(name)),
                &[],
                NO_BODY,
                ErrorContext::resource(name),
            )
            .await;

        match result {
            Ok(project) => Ok(Some(project.into())),
            Err(ProviderError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list_projects(&self) -> Result<Vec<HostingProject>> {
        let mut projects = Vec::new();
        let mut until: Option<i64> = None;

        loop {
            let mut query = vec![("limit", MAX_PAGE_SIZE_PROJECTS.to_string())];
            if let Some(cursor) = until {
                query.push(("until", cursor.to_string()));
            }
            let page: VercelProjectList = self
                .execute_json(
                    Method::GET,
                    "/v9/projects",
                    &query,
                    NO_BODY,
                    ErrorContext::default(),
                )
                .await?;

            projects.extend(page.projects.into_iter().map(HostingProject::from));
            match page.pagination.and_then(|p| p.next) {
                Some(next) => until = Some(next),
                None => break,
            }
        }

        Ok(projects)
    }

    async fn delete_project(&self, name: &str) -> Result<()> {
        self.execute(
            Method::DELETE,
            &format!("/v9/projects/{}", urlencoding::encode(name)),
            &[],
            NO_BODY,
            ErrorContext::resource(name),
        )
        .await?;
        log::info!("[vercel] Deleted project {name}");
        Ok(())
    }

    async fn create_deployment(&self, req: &CreateDeploymentRequest) -> Result<Deployment> {
        let body = VercelCreateDeployment {
            name: &req.project,
            project: &req.project,
            git_source: VercelGitSource {
                kind: "github",
                repo_id: req.repo_id,
                git_ref: &req.git_ref,
            },
            target: req.production.then_some("production"),
        };
        let deployment: VercelDeployment = self
            .execute_json(
                Method::POST,
                "/v13/deployments",
                &[],
                Some(&body),
                ErrorContext::resource(&req.project),
            )
            .await?;
        log::info!(
            "[vercel] Deployment {} queued for {} ({:?})",
            deployment.id,
            req.project,
            deployment.ready_state
        );
        Ok(deployment.into())
    }

    async fn add_domain(&self, project: &str, domain: &str) -> Result<ProjectDomain> {
        let domain_entry: VercelProjectDomain = self
            .execute_json(
                Method::POST,
                &format!("/v10/projects/{}/domains", urlencoding::encode(project)),
                &[],
                Some(&VercelAddDomain { name: domain }),
                ErrorContext::resource(domain),
            )
            .await?;
        log::info!("[vercel] Attached {domain} to {project}");
        Ok(domain_entry.into())
    }

    async fn domain_project(&self, domain: &str) -> Result<Option<String>> {
        let result: Result<VercelAlias> = self
            .execute_json(
                Method::GET,
                &format!("/v4/aliases/{}", urlencoding::encode(domain)),
                &[],
                NO_BODY,
                ErrorContext::resource(domain),
            )
            .await;

        let alias = match result {
            Ok(alias) => alias,
            Err(ProviderError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        // An alias left by a deleted project still blocks the domain.
        let Some(project_id) = alias.project_id else {
            return Ok(Some(alias.alias));
        };
        let owner = self
            .get_project(&project_id)
            .await?
            .map_or(project_id, |project| project.name);
        log::debug!("[vercel] {domain} is served by project {owner}");
        Ok(Some(owner))
    }

    async fn domain_config(&self, domain: &str) -> Result<DomainConfiguration> {
        let config: VercelDomainConfig = self
            .execute_json(
                Method::GET,
                &format!("/v6/domains/{}/config", urlencoding::encode(domain)),
                &[],
                NO_BODY,
                ErrorContext::resource(domain),
            )
            .await?;
        Ok(DomainConfiguration {
            domain: domain.to_string(),
            misconfigured: config.misconfigured,
        })
    }

    fn default_url(&self, project: &str) -> String {
        format!("https://{project}.vercel.app")
    }
}
