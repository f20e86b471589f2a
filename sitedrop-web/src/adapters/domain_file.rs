//! Root-domain file loader

use std::path::Path;

use anyhow::Context;
use sitedrop_core::types::DomainRegistry;

/// Reads the `{"example.com": {"zone": "...", "apitoken": "..."}}` file.
pub fn load_domain_registry(path: &Path) -> anyhow::Result<DomainRegistry> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read domains file {}", path.display()))?;
    let registry = DomainRegistry::from_json(&raw)
        .with_context(|| format!("Invalid domains file {}", path.display()))?;

    if registry.is_empty() {
        tracing::warn!("No root domains configured in {}", path.display());
    }
    Ok(registry)
}
