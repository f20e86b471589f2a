//! Cloudflare error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::CloudflareProvider;

/// Cloudflare error code mapping
/// Reference: <https://api.cloudflare.com/#getting-started-responses>
///
/// Bodies that are not a Cloudflare envelope arrive with the HTTP status as the code.
impl ProviderErrorMapper for CloudflareProvider {
    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // Authentication error
            // 6003: Invalid request headers
            // 6111: Invalid format for Authorization header
            // 9109: Unauthorized to access requested resource
            // 10000: Authentication error
            Some("401" | "6003" | "6111" | "9109" | "10000") => {
                ProviderError::InvalidCredentials {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                }
            }

            Some("403") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // Invalid parameter
            // 1004: DNS Validation Error
            // 9000: Invalid or missing name
            // 9005: Content for A record is invalid
            // 9021: Invalid TTL
            // 9041: This DNS record cannot be proxied
            Some(code @ ("1004" | "9000" | "9005" | "9021" | "9041")) => {
                let param = match code {
                    "9000" => "name",
                    "9005" => "content",
                    "9021" => "ttl",
                    "9041" => "proxied",
                    // "1004" is a general validation error.
                    _ => "general",
                };
                ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: param.to_string(),
                    detail: raw.message,
                }
            }

            // Record already exists
            // 81053: An A, AAAA or CNAME record already exists with that host
            // 81057: The record already exists
            // 81058: A record with those settings already exists
            Some("81053" | "81057" | "81058") => ProviderError::AlreadyExists {
                provider: self.provider_name().to_string(),
                resource: context.resource_or_unknown(),
                raw_message: Some(raw.message),
            },

            // 81044: Record does not exist
            // 7000: No route for that URI
            // 7003: Could not route, perhaps the object identifier is invalid
            Some("404" | "81044" | "7000" | "7003") => ProviderError::NotFound {
                provider: self.provider_name().to_string(),
                resource: context.resource_or_unknown(),
                raw_message: Some(raw.message),
            },

            // 81045: The record quota has been exceeded
            Some("81045") => ProviderError::QuotaExceeded {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> CloudflareProvider {
        CloudflareProvider::new(String::new()).unwrap()
    }

    fn ctx() -> ErrorContext {
        ErrorContext::default()
    }

    #[test]
    fn auth_errors() {
        let p = provider();
        for code in ["401", "6003", "6111", "9109", "10000"] {
            let err = p.map_error(RawApiError::with_code(code, "auth"), ctx());
            assert!(
                matches!(err, ProviderError::InvalidCredentials { .. }),
                "code {code}"
            );
        }
    }

    #[test]
    fn forbidden_status() {
        let err = provider().map_error(RawApiError::with_code("403", "forbidden"), ctx());
        assert!(matches!(err, ProviderError::PermissionDenied { .. }));
    }

    #[test]
    fn invalid_param_names() {
        let p = provider();
        let cases = [
            ("1004", "general"),
            ("9000", "name"),
            ("9005", "content"),
            ("9021", "ttl"),
            ("9041", "proxied"),
        ];
        for (code, expected) in cases {
            let err = p.map_error(RawApiError::with_code(code, "bad"), ctx());
            assert!(
                matches!(&err, ProviderError::InvalidParameter { param, .. } if param == expected),
                "code {code} -> {err:?}"
            );
        }
    }

    #[test]
    fn record_exists_uses_context() {
        let err = provider().map_error(
            RawApiError::with_code("81057", "record already exists"),
            ErrorContext::resource("demo"),
        );
        assert!(matches!(
            err,
            ProviderError::AlreadyExists { resource, .. } if resource == "demo"
        ));
    }

    #[test]
    fn record_not_found_default_context() {
        let err = provider().map_error(
            RawApiError::with_code("81044", "record does not exist"),
            ctx(),
        );
        assert!(matches!(
            err,
            ProviderError::NotFound { resource, .. } if resource == "<unknown>"
        ));
    }

    #[test]
    fn zone_not_routed_is_not_found() {
        let err = provider().map_error(
            RawApiError::with_code("7003", "could not route"),
            ErrorContext::resource("zone-1"),
        );
        assert!(matches!(err, ProviderError::NotFound { resource, .. } if resource == "zone-1"));
    }

    #[test]
    fn quota_exceeded_81045() {
        let err = provider().map_error(
            RawApiError::with_code("81045", "record quota exceeded"),
            ctx(),
        );
        assert!(matches!(err, ProviderError::QuotaExceeded { .. }));
    }

    #[test]
    fn fallback_unknown_code() {
        let err = provider().map_error(
            RawApiError::with_code("99999", "something unexpected"),
            ctx(),
        );
        assert!(matches!(
            err,
            ProviderError::Unknown { raw_code, raw_message, .. }
                if raw_code.as_deref() == Some("99999") && raw_message == "something unexpected"
        ));
    }

    #[test]
    fn fallback_no_code() {
        let err = provider().map_error(RawApiError::new("no code at all"), ctx());
        assert!(matches!(
            err,
            ProviderError::Unknown { raw_code: None, raw_message, .. }
                if raw_message == "no code at all"
        ));
    }

    #[test]
    fn error_contains_provider_name() {
        let err = provider().map_error(RawApiError::with_code("6003", "bad header"), ctx());
        assert_eq!(err.provider(), "cloudflare");
    }
}
