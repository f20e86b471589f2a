//! Type definitions

mod admin;
mod api_key;
mod domain;
mod site;

pub use admin::{
    AdminAction, AdminRequest, AdminResponse, Availability, CreateKeyPayload, DomainPayload,
    DomainStatusReport, FlexibleNumber, KeyPayload, ProjectPayload, ProjectSummary, RepoPayload,
    RepositorySummary, SubdomainPayload,
};
pub use api_key::{
    ApiKey, ApiKeyMap, CreateKeyRequest, DurationUnit, KeyExpiry, KeyLifetime, Revision,
    VersionedKeys,
};
pub use domain::{DomainConfig, DomainRegistry};
pub use site::{PublishRequest, SiteRecord, SiteStatus, UploadedBundle};

// Re-export the provider types used across the core API
pub use sitedrop_provider::{
    DnsRecord, DnsRecordType, FileUpload, HostingProject, ProviderCredentials, Repository,
};
