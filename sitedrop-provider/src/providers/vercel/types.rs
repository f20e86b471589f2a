//! Vercel REST types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Deployment, HostingProject, ProjectDomain, ProjectLink};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub link: Option<VercelLink>,
    #[serde(default, with = "crate::utils::datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelLink {
    #[serde(default)]
    pub org: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub repo_id: Option<u64>,
}

impl From<VercelProject> for HostingProject {
    fn from(project: VercelProject) -> Self {
        Self {
            id: project.id,
            name: project.name,
            link: project.link.map(|l| ProjectLink {
                org: l.org,
                repo: l.repo,
                repo_id: l.repo_id,
            }),
            created_at: project.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VercelProjectList {
    pub projects: Vec<VercelProject>,
    #[serde(default)]
    pub pagination: Option<VercelPagination>,
}

#[derive(Debug, Deserialize)]
pub struct VercelPagination {
    /// Cursor (timestamp) for the next page, `null` on the last one
    #[serde(default)]
    pub next: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelCreateProject<'a> {
    pub name: &'a str,
    pub git_repository: VercelGitRepository<'a>,
    /// `null` deploys the repository as a static site
    pub framework: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct VercelGitRepository<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub repo: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelCreateDeployment<'a> {
    pub name: &'a str,
    pub project: &'a str,
    pub git_source: VercelGitSource<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelGitSource<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub repo_id: u64,
    #[serde(rename = "ref")]
    pub git_ref: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelDeployment {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ready_state: Option<String>,
}

impl From<VercelDeployment> for Deployment {
    fn from(d: VercelDeployment) -> Self {
        Self {
            id: d.id,
            url: d.url,
            ready_state: d.ready_state,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VercelAddDomain<'a> {
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct VercelProjectDomain {
    pub name: String,
    #[serde(default)]
    pub verified: bool,
}

impl From<VercelProjectDomain> for ProjectDomain {
    fn from(d: VercelProjectDomain) -> Self {
        Self {
            name: d.name,
            verified: d.verified,
        }
    }
}

/// `GET /v4/aliases/{alias}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelAlias {
    pub alias: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// `GET /v6/domains/{domain}/config`
#[derive(Debug, Deserialize)]
pub struct VercelDomainConfig {
    pub misconfigured: bool,
}

/// Error body: `{"error": {"code": "...", "message": "..."}}`
#[derive(Debug, Deserialize)]
pub struct VercelErrorBody {
    pub error: VercelErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct VercelErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
