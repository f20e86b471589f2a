use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Source Control Types ============

/// A repository on the source-control host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Numeric repository identifier (used by the hosting platform to link deployments).
    pub id: u64,
    /// Repository name without owner (e.g., `"demo-417"`).
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// Whether the repository is private.
    pub private: bool,
    /// Browser URL of the repository.
    pub html_url: String,
    /// Default branch, when the host reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
}

/// Request to create a repository under the authenticated account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRepositoryRequest {
    /// Repository name.
    pub name: String,
    /// Create as private.
    pub private: bool,
    /// Optional description shown on the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A file read back through the content API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryFile {
    /// Path inside the repository.
    pub path: String,
    /// Blob sha, the revision token required to overwrite the file.
    pub sha: String,
    /// Decoded file content.
    pub content: Vec<u8>,
}

/// Request to create or overwrite a single file through the content API.
#[derive(Debug, Clone)]
pub struct PutFileRequest {
    /// Path inside the repository (forward slashes).
    pub path: String,
    /// Raw file content; encoded by the client.
    pub content: Vec<u8>,
    /// Commit message.
    pub message: String,
    /// Expected blob sha of the current file. `None` creates the file.
    pub sha: Option<String>,
}

/// One file of a site bundle, addressed by its path relative to the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Relative path with forward slashes (e.g., `"css/site.css"`).
    pub path: String,
    /// Raw file content.
    pub content: Vec<u8>,
}

// ============ Hosting Types ============

/// Git link of a hosting project.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLink {
    /// Repository owner (user or organisation).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    /// Repository name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// Numeric repository id on the source-control host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_id: Option<u64>,
}

impl ProjectLink {
    /// `owner/name` of the linked repository, when both halves are known.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match (&self.org, &self.repo) {
            (Some(org), Some(repo)) => Some(format!("{org}/{repo}")),
            _ => None,
        }
    }
}

/// A project on the hosting platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HostingProject {
    /// Platform project id.
    pub id: String,
    /// Project name (also the default `*.vercel.app` host label).
    pub name: String,
    /// Linked git repository, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<ProjectLink>,
    /// Creation time, if reported.
    #[serde(default, with = "crate::utils::datetime")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request to create a hosting project linked to a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    /// Project name.
    pub name: String,
    /// Linked repository as `owner/name`.
    pub repository: String,
    /// Framework preset; `None` deploys the files as a static site.
    pub framework: Option<String>,
}

/// Request to deploy a project from a git ref.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentRequest {
    /// Project name.
    pub project: String,
    /// Numeric repository id from the project link or the source-control host.
    pub repo_id: u64,
    /// Branch or tag to deploy.
    pub git_ref: String,
    /// Deploy to the production target.
    pub production: bool,
}

/// A deployment accepted by the hosting platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// Deployment id.
    pub id: String,
    /// Deployment host (without scheme), if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Build state reported at creation (`QUEUED`, `BUILDING`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_state: Option<String>,
}

/// A custom domain attached to a hosting project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDomain {
    /// Fully qualified domain name.
    pub name: String,
    /// Whether the platform considers ownership verified.
    pub verified: bool,
}

/// Point-in-time configuration state of a domain as seen by the hosting platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DomainConfiguration {
    /// Domain that was checked.
    pub domain: String,
    /// `true` while DNS does not point at the platform yet.
    pub misconfigured: bool,
}

// ============ DNS Types ============

/// DNS record type.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
    /// Name server record.
    Ns,
    /// Service locator record.
    Srv,
    /// Certificate Authority Authorization record.
    Caa,
}

impl DnsRecordType {
    /// Wire name used by the provider APIs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
        }
    }
}

/// A DNS record as returned by a provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    /// Provider-specific record identifier.
    pub id: String,
    /// Zone identifier this record belongs to.
    pub zone_id: String,
    /// Fully qualified record name (e.g., `"demo.example.com"`).
    pub name: String,
    /// Record type as reported by the provider (kept raw so unknown types survive listing).
    pub record_type: String,
    /// Record content (address, target, text).
    pub content: String,
    /// Time to live in seconds (`1` = automatic on Cloudflare).
    pub ttl: u32,
    /// Whether the Cloudflare proxy is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
}

/// Request to create a DNS record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDnsRecordRequest {
    /// Zone to create the record in.
    pub zone_id: String,
    /// Record name, relative (`"demo"`) or fully qualified.
    pub name: String,
    /// Record type.
    pub record_type: DnsRecordType,
    /// Record content.
    pub content: String,
    /// Time to live in seconds (`1` = automatic).
    pub ttl: u32,
    /// Enable the Cloudflare proxy.
    pub proxied: Option<bool>,
}

/// Filters for DNS record listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordQueryParams {
    /// Exact fully qualified name to match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional record type filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_type: Option<DnsRecordType>,
}

impl RecordQueryParams {
    /// Match every record whose name equals `fqdn`, regardless of type.
    #[must_use]
    pub fn by_name(fqdn: impl Into<String>) -> Self {
        Self {
            name: Some(fqdn.into()),
            record_type: None,
        }
    }
}

/// Result of a batch delete operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteResult {
    /// Number of records successfully deleted.
    pub success_count: usize,
    /// Number of records that failed to delete.
    pub failed_count: usize,
    /// Details of each failed deletion.
    pub failures: Vec<BatchDeleteFailure>,
}

/// Details of a single failed record in a batch delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteFailure {
    /// ID of the record that failed to delete.
    pub record_id: String,
    /// Error message describing the failure.
    pub reason: String,
}

// ============ Credentials ============

/// Type-safe credential container for the supported DNS providers.
///
/// Pass this to [`create_provider()`](crate::create_provider) to instantiate a provider.
///
/// ```json
/// { "provider": "cloudflare", "credentials": { "api_token": "..." } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", content = "credentials")]
pub enum ProviderCredentials {
    /// Cloudflare credentials.
    #[serde(rename = "cloudflare")]
    Cloudflare {
        /// Cloudflare API token scoped to the zone.
        api_token: String,
    },
}
