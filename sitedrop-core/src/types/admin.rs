//! Admin action types
//!
//! Requests arrive as `{"action": "...", "data": {...}, "adminPassword": "..."}`.
//! Action names accept both the current spelling and the one used by the
//! original admin panel (`getApiKeys`, `createApiKey`, ...).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::types::api_key::{ApiKeyMap, CreateKeyRequest, DurationUnit, KeyLifetime};
use crate::types::site::SiteStatus;
use crate::utils::datetime;

/// Admin JSON envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRequest {
    pub action: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub admin_password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    ListKeys,
    CreateKey,
    DeleteKey,
    ListProjects,
    DeleteProject,
    ListRepos,
    DeleteRepo,
    DeleteHostingProject,
    CheckSubdomainAvailability,
    CheckDomainStatus,
}

impl AdminAction {
    /// Everything except the two public probes needs the admin password.
    #[must_use]
    pub fn requires_auth(self) -> bool {
        !matches!(
            self,
            Self::CheckSubdomainAvailability | Self::CheckDomainStatus
        )
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ListKeys => "listKeys",
            Self::CreateKey => "createKey",
            Self::DeleteKey => "deleteKey",
            Self::ListProjects => "listProjects",
            Self::DeleteProject => "deleteProject",
            Self::ListRepos => "listRepos",
            Self::DeleteRepo => "deleteRepo",
            Self::DeleteHostingProject => "deleteHostingProject",
            Self::CheckSubdomainAvailability => "checkSubdomainAvailability",
            Self::CheckDomainStatus => "checkDomainStatus",
        }
    }
}

impl FromStr for AdminAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "listKeys" | "getApiKeys" => Ok(Self::ListKeys),
            "createKey" | "createApiKey" => Ok(Self::CreateKey),
            "deleteKey" | "deleteApiKey" => Ok(Self::DeleteKey),
            "listProjects" => Ok(Self::ListProjects),
            "deleteProject" => Ok(Self::DeleteProject),
            "listRepos" => Ok(Self::ListRepos),
            "deleteRepo" => Ok(Self::DeleteRepo),
            "deleteHostingProject" | "deleteVercelProject" => Ok(Self::DeleteHostingProject),
            "checkSubdomainAvailability" | "checkSubdomain" => {
                Ok(Self::CheckSubdomainAvailability)
            }
            "checkDomainStatus" => Ok(Self::CheckDomainStatus),
            other => Err(CoreError::ValidationError(format!(
                "Unknown admin action: '{other}'"
            ))),
        }
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ===== Payloads =====

/// Number that may arrive as JSON number or numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FlexibleNumber {
    Number(serde_json::Number),
    Text(String),
}

impl FlexibleNumber {
    /// Positive integer value, `None` otherwise.
    #[must_use]
    pub fn as_positive_u32(&self) -> Option<u32> {
        let value = match self {
            Self::Number(n) => n.as_u64()?,
            Self::Text(s) => s.trim().parse::<u64>().ok()?,
        };
        u32::try_from(value).ok().filter(|v| *v > 0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeyPayload {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub duration: Option<FlexibleNumber>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub is_permanent: bool,
}

impl CreateKeyPayload {
    /// Validates the payload into a typed request.
    pub fn into_request(self) -> CoreResult<CreateKeyRequest> {
        let key = self.key.trim().to_string();
        if key.is_empty() {
            return Err(CoreError::ValidationError(
                "API key name must not be empty".to_string(),
            ));
        }

        let lifetime = if self.is_permanent {
            KeyLifetime::Permanent
        } else {
            let amount = self
                .duration
                .as_ref()
                .and_then(FlexibleNumber::as_positive_u32)
                .ok_or_else(|| {
                    CoreError::ValidationError("Duration must be a positive integer".to_string())
                })?;
            let unit: DurationUnit = self
                .unit
                .as_deref()
                .ok_or_else(|| CoreError::ValidationError("Duration unit is required".into()))?
                .parse()?;
            KeyLifetime::For { amount, unit }
        };

        Ok(CreateKeyRequest { key, lifetime })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyPayload {
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPayload {
    #[serde(default, alias = "projectName")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoPayload {
    #[serde(default, alias = "repoName")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubdomainPayload {
    #[serde(default)]
    pub subdomain: String,
    #[serde(default)]
    pub root_domain: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DomainPayload {
    #[serde(default)]
    pub domain: String,
}

// ===== Responses =====

/// Hosting project as listed to the admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    /// Linked repository as `owner/name`
    pub repository: Option<String>,
    /// Platform default URL
    pub url: String,
    #[serde(with = "datetime::option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Repository as listed to the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySummary {
    pub name: String,
    pub full_name: String,
    pub url: String,
    pub private: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub available: bool,
}

/// Point-in-time domain configuration check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainStatusReport {
    pub domain: String,
    pub status: SiteStatus,
    pub message: String,
}

/// Action-specific response body.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AdminResponse {
    Keys(ApiKeyMap),
    Projects(Vec<ProjectSummary>),
    Repositories(Vec<RepositorySummary>),
    Availability(Availability),
    DomainStatus(DomainStatusReport),
    Message { message: String },
}

impl AdminResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}
