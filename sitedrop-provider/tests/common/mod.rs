//! Shared helpers for the live integration tests

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use sitedrop_provider::{
    DnsProvider, GithubProvider, HostingPlatform, ProviderCredentials, SourceControlHost,
    VercelProvider, create_provider,
};

/// Skips the test when an environment variable is missing.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Asserts `Some` and unwraps it, failing the test otherwise.
#[macro_export]
macro_rules! require_some {
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Asserts `Ok` and unwraps it, failing the test otherwise.
#[macro_export]
macro_rules! require_ok {
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Unique label for throwaway test resources.
pub fn generate_test_label() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("sitedrop-test-{}", &uuid.to_string()[..8])
}

pub fn github() -> Option<Arc<dyn SourceControlHost>> {
    let token = env::var("GITHUB_TOKEN").ok()?;
    let owner = env::var("REPO_OWNER").ok()?;
    Some(Arc::new(GithubProvider::new(token, owner).ok()?))
}

pub fn vercel() -> Option<Arc<dyn HostingPlatform>> {
    let token = env::var("VERCEL_TOKEN").ok()?;
    let team_id = env::var("VERCEL_TEAM_ID").ok();
    Some(Arc::new(VercelProvider::new(token, team_id).ok()?))
}

/// Cloudflare provider plus the zone id and zone name to test against.
pub fn cloudflare() -> Option<(Arc<dyn DnsProvider>, String, String)> {
    let api_token = env::var("CLOUDFLARE_API_TOKEN").ok()?;
    let zone_id = env::var("CLOUDFLARE_ZONE_ID").ok()?;
    let zone_name = env::var("TEST_DOMAIN").ok()?;
    let provider = create_provider(ProviderCredentials::Cloudflare { api_token }).ok()?;
    Some((provider, zone_id, zone_name))
}
