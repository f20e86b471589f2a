//! GitHub error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::GithubProvider;

/// GitHub reports errors through the HTTP status; the code here is the status.
/// Reference: <https://docs.github.com/en/rest/using-the-rest-api/troubleshooting-the-rest-api>
impl ProviderErrorMapper for GithubProvider {
    fn provider_name(&self) -> &'static str {
        "github"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let lower = raw.message.to_lowercase();
        match raw.code.as_deref() {
            Some("401") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // Primary and secondary rate limits arrive as 403
            Some("403") if lower.contains("rate limit") => ProviderError::RateLimited {
                provider: self.provider_name().to_string(),
                retry_after: None,
                raw_message: Some(raw.message),
            },

            Some("403") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            Some("404") => ProviderError::NotFound {
                provider: self.provider_name().to_string(),
                resource: context.resource_or_unknown(),
                raw_message: Some(raw.message),
            },

            // Content write against a moved blob sha
            Some("409") => ProviderError::Conflict {
                provider: self.provider_name().to_string(),
                resource: context.resource_or_unknown(),
                raw_message: Some(raw.message),
            },

            Some("422") if lower.contains("already exists") => ProviderError::AlreadyExists {
                provider: self.provider_name().to_string(),
                resource: context.resource_or_unknown(),
                raw_message: Some(raw.message),
            },

            // Overwriting a file without (or with a wrong) sha
            Some("422") if lower.contains("sha") => ProviderError::Conflict {
                provider: self.provider_name().to_string(),
                resource: context.resource_or_unknown(),
                raw_message: Some(raw.message),
            },

            Some("422") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: context.resource_or_unknown(),
                detail: raw.message,
            },

            _ => self.unknown_error(raw),
        }
    }
}
