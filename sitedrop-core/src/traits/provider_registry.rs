//! DNS provider registry abstraction

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use sitedrop_provider::DnsProvider;

/// Provider Registry Trait
///
/// Holds one DNS provider client per configured root domain.
/// [`InMemoryProviderRegistry`] is the default implementation.
#[async_trait]
pub trait ProviderRegistry: Send + Sync {
    /// Registers the client for `root_domain`, replacing any previous one.
    async fn register(&self, root_domain: String, provider: Arc<dyn DnsProvider>);

    /// Client for `root_domain`.
    async fn get(&self, root_domain: &str) -> Option<Arc<dyn DnsProvider>>;

    /// Registered root domains, sorted.
    async fn list_root_domains(&self) -> Vec<String>;
}

/// In-memory Provider registry
#[derive(Clone)]
pub struct InMemoryProviderRegistry {
    providers: Arc<RwLock<HashMap<String, Arc<dyn DnsProvider>>>>,
}

impl InMemoryProviderRegistry {
    /// Create a new memory registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registry pre-filled at construction, before any task can observe it.
    #[must_use]
    pub fn with_providers(
        providers: impl IntoIterator<Item = (String, Arc<dyn DnsProvider>)>,
    ) -> Self {
        Self {
            providers: Arc::new(RwLock::new(providers.into_iter().collect())),
        }
    }
}

impl Default for InMemoryProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderRegistry for InMemoryProviderRegistry {
    async fn register(&self, root_domain: String, provider: Arc<dyn DnsProvider>) {
        self.providers.write().await.insert(root_domain, provider);
    }

    async fn get(&self, root_domain: &str) -> Option<Arc<dyn DnsProvider>> {
        self.providers.read().await.get(root_domain).cloned()
    }

    async fn list_root_domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self.providers.read().await.keys().cloned().collect();
        domains.sort();
        domains
    }
}
