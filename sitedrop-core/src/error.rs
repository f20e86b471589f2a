//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use sitedrop_provider::ProviderError;

use crate::saga::ProvisionStep;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Missing or malformed input
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The requested root domain has no zone credentials
    #[error("Root domain is not configured: {0}")]
    DomainNotConfigured(String),

    /// Admin password missing or wrong
    #[error("Invalid admin password")]
    AdminUnauthorized,

    /// Publish key not present in the store
    #[error("Invalid API key")]
    ApiKeyInvalid,

    /// Publish key present but past its expiry
    #[error("API key has expired")]
    ApiKeyExpired,

    /// Key name taken at creation time
    #[error("API key already exists: {0}")]
    ApiKeyExists(String),

    /// Key name absent at deletion time
    #[error("API key not found: {0}")]
    ApiKeyNotFound(String),

    /// Hosting project or repository absent
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// Project name or custom domain already in use
    #[error("Subdomain is already taken: {0}")]
    SubdomainTaken(String),

    /// Upload larger than the configured limit
    #[error("Upload exceeds the limit of {limit} bytes")]
    PayloadTooLarge { limit: u64 },

    /// Unsupported or unusable site bundle
    #[error("Invalid bundle: {0}")]
    BundleError(String),

    /// Stored document moved since it was read
    #[error("Revision conflict on {0}")]
    RevisionConflict(String),

    /// A status probe did not answer in time
    #[error("{provider} did not respond within {seconds}s")]
    ProviderUnresponsive { provider: String, seconds: u64 },

    /// A provisioning step failed after earlier steps took effect
    #[error(
        "Provisioning failed at {step}: {source} (completed: {})",
        ProvisionStep::join(.completed)
    )]
    Provisioning {
        step: ProvisionStep,
        completed: Vec<ProvisionStep>,
        rolled_back: Vec<String>,
        rollback_failures: Vec<String>,
        source: ProviderError,
    },

    /// A multi-resource delete stopped halfway
    #[error("Removed {} but failed to remove {failed}: {source}", .removed.join(", "))]
    PartialFailure {
        removed: Vec<String>,
        failed: String,
        source: ProviderError,
    },

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Provider error (converted from the provider library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, missing resource, ...), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Keep in sync when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ValidationError(_)
            | Self::DomainNotConfigured(_)
            | Self::AdminUnauthorized
            | Self::ApiKeyInvalid
            | Self::ApiKeyExpired
            | Self::ApiKeyExists(_)
            | Self::ApiKeyNotFound(_)
            | Self::ProjectNotFound(_)
            | Self::SubdomainTaken(_)
            | Self::PayloadTooLarge { .. }
            | Self::BundleError(_) => true,
            Self::Provider(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
