//! Application state shared by every worker

use std::sync::Arc;

use anyhow::Context;
use sitedrop_core::services::{AdminService, PublishService};
use sitedrop_core::traits::InMemoryProviderRegistry;
use sitedrop_core::ServiceContext;
use sitedrop_provider::{
    create_provider, DnsProvider, GithubProvider, ProviderCredentials, VercelProvider,
};

use crate::adapters::{load_domain_registry, GithubApiKeyStore};
use crate::config::{AppConfig, ProviderEnv};

pub struct AppState {
    pub ctx: Arc<ServiceContext>,
    pub publish: PublishService,
    pub admin: AdminService,
}

impl AppState {
    pub fn new(ctx: Arc<ServiceContext>, admin_password: impl Into<String>) -> Self {
        Self {
            publish: PublishService::new(Arc::clone(&ctx)),
            admin: AdminService::new(Arc::clone(&ctx), admin_password),
            ctx,
        }
    }

    /// Builds the provider clients, the domain registry and the key store.
    pub fn from_config(config: &AppConfig, env: &ProviderEnv) -> anyhow::Result<Self> {
        let github = Arc::new(
            GithubProvider::new(env.github_token.clone(), env.repo_owner.clone())
                .context("Failed to create GitHub client")?,
        );
        let vercel = Arc::new(
            VercelProvider::new(env.vercel_token.clone(), env.vercel_team_id.clone())
                .context("Failed to create Vercel client")?,
        );

        let domains = load_domain_registry(&config.publish.domains_file)?;
        let mut dns_clients: Vec<(String, Arc<dyn DnsProvider>)> = Vec::with_capacity(domains.len());
        for (root_domain, domain) in domains.iter() {
            let client = create_provider(ProviderCredentials::Cloudflare {
                api_token: domain.api_token.clone(),
            })
            .with_context(|| format!("Failed to create DNS client for {root_domain}"))?;
            dns_clients.push((root_domain.clone(), client));
        }
        tracing::info!("Configured root domains: {}", domains.root_domains().join(", "));

        let key_store = GithubApiKeyStore::new(
            Arc::<GithubProvider>::clone(&github),
            env.config_repo.clone(),
            config.publish.key_store_path.clone(),
        );

        let ctx = ServiceContext::new(
            github,
            vercel,
            Arc::new(InMemoryProviderRegistry::with_providers(dns_clients)),
            Arc::new(domains),
            Arc::new(key_store),
            config.publish_settings(),
        );
        Ok(Self::new(Arc::new(ctx), env.admin_password.clone()))
    }
}
