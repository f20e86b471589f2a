//! Vercel error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::VercelProvider;

/// Vercel error codes come from `{"error": {"code": ...}}`; the HTTP status is
/// used when the body carries no code.
/// Reference: <https://vercel.com/docs/rest-api/errors>
impl ProviderErrorMapper for VercelProvider {
    fn provider_name(&self) -> &'static str {
        "vercel"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            Some("401" | "invalid_token" | "not_authorized") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            Some("403" | "forbidden" | "team_unauthorized") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            Some("404" | "not_found" | "project_not_found") => ProviderError::NotFound {
                provider: self.provider_name().to_string(),
                resource: context.resource_or_unknown(),
                raw_message: Some(raw.message),
            },

            // Project name taken, domain attached elsewhere
            Some(
                "409" | "conflict" | "project_already_exists" | "domain_already_in_use"
                | "domain_already_exists",
            ) => ProviderError::AlreadyExists {
                provider: self.provider_name().to_string(),
                resource: context.resource_or_unknown(),
                raw_message: Some(raw.message),
            },

            Some("402" | "payment_required" | "limit_exceeded" | "too_many_projects") => {
                ProviderError::QuotaExceeded {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                }
            }

            Some("400" | "bad_request" | "invalid_name" | "invalid_domain") => {
                ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: context.resource_or_unknown(),
                    detail: raw.message,
                }
            }

            _ => self.unknown_error(raw),
        }
    }
}
