//! Admin action routing

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::services::{ApiKeyService, ProjectService, ServiceContext};
use crate::types::{
    AdminAction, AdminRequest, AdminResponse, CreateKeyPayload, DomainPayload, KeyPayload,
    ProjectPayload, RepoPayload, SubdomainPayload,
};

/// Dispatches admin JSON actions.
///
/// The password is checked on every call; there is no session.
pub struct AdminService {
    admin_password: String,
    keys: ApiKeyService,
    projects: ProjectService,
}

impl AdminService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, admin_password: impl Into<String>) -> Self {
        Self {
            admin_password: admin_password.into(),
            keys: ApiKeyService::new(Arc::clone(&ctx)),
            projects: ProjectService::new(ctx),
        }
    }

    pub async fn dispatch(&self, request: AdminRequest) -> CoreResult<AdminResponse> {
        // Only a known public action skips the password.
        let parsed = request.action.parse::<AdminAction>();
        let public = parsed.as_ref().is_ok_and(|a| !a.requires_auth());
        if !public && !self.is_authorized(request.admin_password.as_deref()) {
            log::warn!("Rejected admin action '{}': bad password", request.action);
            return Err(CoreError::AdminUnauthorized);
        }
        let action = parsed?;
        log::debug!("Admin action '{action}'");

        let data = request.data;
        match action {
            AdminAction::ListKeys => Ok(AdminResponse::Keys(self.keys.list_keys().await?)),
            AdminAction::CreateKey => {
                let request = payload::<CreateKeyPayload>(data)?.into_request()?;
                let name = request.key.clone();
                self.keys.create_key(request).await?;
                Ok(AdminResponse::message(format!(
                    "API key '{name}' created successfully"
                )))
            }
            AdminAction::DeleteKey => {
                let KeyPayload { key } = payload(data)?;
                self.keys.delete_key(&key).await?;
                Ok(AdminResponse::message(format!(
                    "API key '{}' deleted successfully",
                    key.trim()
                )))
            }
            AdminAction::ListProjects => Ok(AdminResponse::Projects(
                self.projects.list_projects().await?,
            )),
            AdminAction::DeleteProject => {
                let ProjectPayload { name } = payload(data)?;
                self.projects.delete_project(&name).await?;
                Ok(AdminResponse::message(format!(
                    "Project '{}' and its repository deleted",
                    name.trim()
                )))
            }
            AdminAction::ListRepos => Ok(AdminResponse::Repositories(
                self.projects.list_repositories().await?,
            )),
            AdminAction::DeleteRepo => {
                let RepoPayload { name } = payload(data)?;
                self.projects.delete_repository(&name).await?;
                Ok(AdminResponse::message(format!(
                    "Repository '{}' deleted",
                    name.trim()
                )))
            }
            AdminAction::DeleteHostingProject => {
                let ProjectPayload { name } = payload(data)?;
                self.projects.delete_hosting_project(&name).await?;
                Ok(AdminResponse::message(format!(
                    "Project '{}' deleted",
                    name.trim()
                )))
            }
            AdminAction::CheckSubdomainAvailability => {
                let SubdomainPayload {
                    subdomain,
                    root_domain,
                } = payload(data)?;
                Ok(AdminResponse::Availability(
                    self.projects
                        .check_availability(&subdomain, &root_domain)
                        .await?,
                ))
            }
            AdminAction::CheckDomainStatus => {
                let DomainPayload { domain } = payload(data)?;
                Ok(AdminResponse::DomainStatus(
                    self.projects.domain_status(&domain).await?,
                ))
            }
        }
    }

    fn is_authorized(&self, candidate: Option<&str>) -> bool {
        candidate.is_some_and(|c| constant_time_eq(c.as_bytes(), self.admin_password.as_bytes()))
    }
}

/// Missing `data` reads as an empty object.
fn payload<T: DeserializeOwned>(data: Value) -> CoreResult<T> {
    let data = if data.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        data
    };
    serde_json::from_value(data)
        .map_err(|e| CoreError::ValidationError(format!("Invalid action payload: {e}")))
}

/// Compares without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
