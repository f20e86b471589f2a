//! Storage layer abstraction trait definition

mod api_key_store;
mod provider_registry;

pub use api_key_store::{ApiKeyStore, InMemoryApiKeyStore};
pub use provider_registry::{InMemoryProviderRegistry, ProviderRegistry};
