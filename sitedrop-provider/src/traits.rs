use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    BatchDeleteFailure, BatchDeleteResult, CreateDeploymentRequest, CreateDnsRecordRequest,
    CreateProjectRequest, CreateRepositoryRequest, Deployment, DnsRecord, DomainConfiguration,
    FileUpload, HostingProject, ProjectDomain, PutFileRequest, RecordQueryParams, Repository,
    RepositoryFile,
};

/// Raw API error (internal)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// Error code or HTTP status, format differs per provider
    pub code: Option<String>,
    /// Raw error message
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Extra context for error mapping (internal)
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Resource the request addressed (repository, project, file path, record id)
    pub resource: Option<String>,
}

impl ErrorContext {
    pub fn resource(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
        }
    }

    pub(crate) fn resource_or_unknown(&self) -> String {
        self.resource
            .clone()
            .unwrap_or_else(|| "<unknown>".to_string())
    }
}

/// Maps raw API errors onto [`ProviderError`] (internal)
pub(crate) trait ProviderErrorMapper {
    /// Provider identifier
    fn provider_name(&self) -> &'static str;

    /// Maps a raw API error to the unified error type
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// Shortcut: parse error
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: unknown error (fallback)
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Git hosting account that stores site sources and the API-key document.
#[async_trait]
pub trait SourceControlHost: Send + Sync {
    /// Provider identifier
    fn id(&self) -> &'static str;

    /// Account that owns created repositories.
    fn owner(&self) -> &str;

    /// Creates a repository under [`owner`](Self::owner).
    async fn create_repository(&self, req: &CreateRepositoryRequest) -> Result<Repository>;

    /// Lists repositories owned by the account (all pages).
    async fn list_repositories(&self) -> Result<Vec<Repository>>;

    /// Deletes `owner/name`.
    async fn delete_repository(&self, name: &str) -> Result<()>;

    /// Reads a file from the default branch of `repo`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    async fn get_file(&self, repo: &str, path: &str) -> Result<Option<RepositoryFile>>;

    /// Creates or overwrites a file, returning the new blob sha.
    ///
    /// A stale [`PutFileRequest::sha`] fails with [`ProviderError::Conflict`].
    async fn put_file(&self, repo: &str, req: &PutFileRequest) -> Result<String>;

    /// Uploads a file set, one commit per file, in order.
    ///
    /// Stops at the first failure; the files uploaded before it stay committed.
    async fn upload_files(&self, repo: &str, files: &[FileUpload], message: &str) -> Result<()> {
        for file in files {
            self.put_file(
                repo,
                &PutFileRequest {
                    path: file.path.clone(),
                    content: file.content.clone(),
                    message: message.to_string(),
                    sha: None,
                },
            )
            .await?;
        }
        Ok(())
    }
}

/// Static-site hosting platform that builds and serves a linked repository.
#[async_trait]
pub trait HostingPlatform: Send + Sync {
    /// Provider identifier
    fn id(&self) -> &'static str;

    /// Creates a project linked to a repository.
    async fn create_project(&self, req: &CreateProjectRequest) -> Result<HostingProject>;

    /// Looks up a project by name, `Ok(None)` if it does not exist.
    async fn get_project(&self, name: &str) -> Result<Option<HostingProject>>;

    /// Lists all projects (all pages).
    async fn list_projects(&self) -> Result<Vec<HostingProject>>;

    /// Deletes a project by name.
    async fn delete_project(&self, name: &str) -> Result<()>;

    /// Triggers a deployment from git.
    async fn create_deployment(&self, req: &CreateDeploymentRequest) -> Result<Deployment>;

    /// Attaches a custom domain to a project.
    async fn add_domain(&self, project: &str, domain: &str) -> Result<ProjectDomain>;

    /// Project serving a custom domain, `Ok(None)` if the domain is unclaimed.
    async fn domain_project(&self, domain: &str) -> Result<Option<String>>;

    /// Reports whether DNS for `domain` already points at the platform.
    async fn domain_config(&self, domain: &str) -> Result<DomainConfiguration>;

    /// Default public URL of a project.
    fn default_url(&self, project: &str) -> String;
}

/// DNS zone management.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Provider identifier
    fn id(&self) -> &'static str;

    /// Lists the records of a zone matching `params` (all pages).
    async fn list_records(&self, zone_id: &str, params: &RecordQueryParams)
    -> Result<Vec<DnsRecord>>;

    /// Creates a DNS record.
    async fn create_record(&self, req: &CreateDnsRecordRequest) -> Result<DnsRecord>;

    /// Deletes a DNS record.
    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()>;

    /// Deletes several records, collecting per-record failures.
    ///
    /// The default calls [`delete_record`](Self::delete_record) for every id concurrently.
    async fn batch_delete_records(
        &self,
        zone_id: &str,
        record_ids: &[String],
    ) -> Result<BatchDeleteResult> {
        let futures: Vec<_> = record_ids
            .iter()
            .map(|id| self.delete_record(zone_id, id))
            .collect();
        let results = futures::future::join_all(futures).await;

        let mut success_count = 0;
        let mut failures = Vec::new();

        for (record_id, result) in record_ids.iter().zip(results) {
            match result {
                Ok(()) => success_count += 1,
                Err(e) => failures.push(BatchDeleteFailure {
                    record_id: record_id.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        Ok(BatchDeleteResult {
            success_count,
            failed_count: failures.len(),
            failures,
        })
    }
}
