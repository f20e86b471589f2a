//! Publishing API key service

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{ApiKey, ApiKeyMap, CreateKeyRequest, KeyExpiry, KeyLifetime};

/// Issues, revokes and checks publishing keys.
pub struct ApiKeyService {
    ctx: Arc<ServiceContext>,
}

impl ApiKeyService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Current key document.
    pub async fn list_keys(&self) -> CoreResult<ApiKeyMap> {
        Ok(self.ctx.key_store.read().await?.keys)
    }

    /// Adds a key; fails with [`CoreError::ApiKeyExists`] if the name is taken.
    pub async fn create_key(&self, request: CreateKeyRequest) -> CoreResult<ApiKey> {
        let now = Utc::now();
        let api_key = ApiKey {
            created_at: now,
            expires_at: expiry_for(&request.lifetime, now)?,
        };
        let message = format!("Create API Key: {}", request.key);

        self.modify(&message, |keys| {
            if keys.contains_key(&request.key) {
                return Err(CoreError::ApiKeyExists(request.key.clone()));
            }
            keys.insert(request.key.clone(), api_key.clone());
            Ok(())
        })
        .await?;

        log::info!("Created API key '{}' ({:?})", request.key, api_key.expires_at);
        Ok(api_key)
    }

    /// Removes a key; fails with [`CoreError::ApiKeyNotFound`] if absent.
    pub async fn delete_key(&self, key: &str) -> CoreResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CoreError::ValidationError(
                "API key name must not be empty".to_string(),
            ));
        }
        let message = format!("Delete API Key: {key}");

        self.modify(&message, |keys| {
            keys.remove(key)
                .map(|_| ())
                .ok_or_else(|| CoreError::ApiKeyNotFound(key.to_string()))
        })
        .await?;

        log::info!("Deleted API key '{key}'");
        Ok(())
    }

    /// Checks that `key` exists and has not expired.
    pub async fn verify_key(&self, key: &str) -> CoreResult<ApiKey> {
        let keys = self.ctx.key_store.read().await?.keys;
        let api_key = keys.get(key).ok_or(CoreError::ApiKeyInvalid)?;
        if !api_key.is_valid_at(Utc::now()) {
            return Err(CoreError::ApiKeyExpired);
        }
        Ok(api_key.clone())
    }

    /// Read-modify-write with a bounded retry on revision conflicts.
    ///
    /// `change` runs against a fresh read on every attempt, so a name that
    /// appeared concurrently is seen by the next attempt.
    async fn modify<F>(&self, message: &str, mut change: F) -> CoreResult<()>
    where
        F: FnMut(&mut ApiKeyMap) -> CoreResult<()> + Send,
    {
        let attempts = self.ctx.settings.key_write_attempts.max(1);
        let mut attempt = 1;
        loop {
            let mut doc = self.ctx.key_store.read().await?;
            change(&mut doc.keys)?;

            match self
                .ctx
                .key_store
                .write(&doc.keys, doc.revision.as_ref(), message)
                .await
            {
                Err(CoreError::RevisionConflict(resource)) if attempt < attempts => {
                    log::warn!(
                        "Revision conflict on {resource} (attempt {attempt}/{attempts}), retrying"
                    );
                    attempt += 1;
                }
                result => return result.map(|_| ()),
            }
        }
    }
}

fn expiry_for(lifetime: &KeyLifetime, now: DateTime<Utc>) -> CoreResult<KeyExpiry> {
    match *lifetime {
        KeyLifetime::Permanent => Ok(KeyExpiry::Permanent),
        KeyLifetime::For { amount, unit } => unit
            .add_to(now, amount)
            .map(KeyExpiry::At)
            .ok_or_else(|| CoreError::ValidationError(format!("Duration {amount} {unit} is too long"))),
    }
}
