//! Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod cloudflare;
mod github;
mod vercel;

pub use cloudflare::CloudflareProvider;
pub use github::GithubProvider;
pub use vercel::VercelProvider;
