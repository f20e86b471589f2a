//! sitedrop core library
//!
//! Business logic of the static-site publisher:
//! - Publish orchestration (bundle preparation, provisioning saga, DNS reconciliation)
//! - Publishing API keys with optimistic-concurrency storage
//! - Admin actions over keys, hosting projects and repositories
//!
//! Storage and provider access go through traits so the web front end
//! injects the real clients and tests inject mocks.

pub mod bundle;
pub mod error;
pub mod saga;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{PublishSettings, ServiceContext};
pub use traits::{ApiKeyStore, ProviderRegistry};
