//! # sitedrop-provider
//!
//! Typed async clients for the three external services a sitedrop publish
//! touches:
//!
//! | Role | Trait | Implementation | Auth |
//! |------|-------|----------------|------|
//! | Source control | [`SourceControlHost`] | [`GithubProvider`] | Bearer token |
//! | Static hosting | [`HostingPlatform`] | [`VercelProvider`] | Bearer token, optional team scope |
//! | DNS | [`DnsProvider`] | [`CloudflareProvider`] | Zone-scoped API token |
//!
//! ## TLS Backend
//!
//! - **`rustls`** *(default)*: Use rustls.
//! - **`native-tls`**: Use the platform's native TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sitedrop_provider::{
//!     create_provider, CreateDnsRecordRequest, DnsRecordType, ProviderCredentials,
//!     RecordQueryParams,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dns = create_provider(ProviderCredentials::Cloudflare {
//!         api_token: "your-token".to_string(),
//!     })?;
//!
//!     // Replace whatever currently answers for demo.example.com
//!     let stale = dns
//!         .list_records("zone-id", &RecordQueryParams::by_name("demo.example.com"))
//!         .await?;
//!     let ids: Vec<String> = stale.into_iter().map(|r| r.id).collect();
//!     dns.batch_delete_records("zone-id", &ids).await?;
//!
//!     dns.create_record(&CreateDnsRecordRequest {
//!         zone_id: "zone-id".to_string(),
//!         name: "demo".to_string(),
//!         record_type: DnsRecordType::A,
//!         content: "76.76.21.21".to_string(),
//!         ttl: 1,
//!         proxied: Some(false),
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError).
//! The error enum provides structured variants for common failure modes:
//!
//! - [`ProviderError::InvalidCredentials`]: authentication failed
//! - [`ProviderError::NotFound`]: repository, project, file or record missing
//! - [`ProviderError::Conflict`]: content write against a stale revision
//! - [`ProviderError::RateLimited`]: API rate limit exceeded (retryable)
//! - [`ProviderError::NetworkError`]: network connectivity issue (retryable)
//!
//! Idempotent requests (GET, DELETE) retry transient errors with exponential
//! backoff. See [`ProviderError`] for the full list.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::create_provider;

// Re-export public traits only (the error mapper stays internal)
pub use traits::{DnsProvider, HostingPlatform, SourceControlHost};

// Re-export types
pub use types::{
    BatchDeleteFailure, BatchDeleteResult, CreateDeploymentRequest, CreateDnsRecordRequest,
    CreateProjectRequest, CreateRepositoryRequest, Deployment, DnsRecord, DnsRecordType,
    DomainConfiguration, FileUpload, HostingProject, ProjectDomain, ProjectLink,
    ProviderCredentials, PutFileRequest, RecordQueryParams, Repository, RepositoryFile,
};

// Re-export utils
pub use utils::datetime;
pub use utils::log_sanitizer::{mask_secret, truncate_for_log};

// Re-export concrete providers
pub use providers::{CloudflareProvider, GithubProvider, VercelProvider};
