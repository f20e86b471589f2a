//! API key document stored as a JSON file in a GitHub repository
//!
//! The blob sha of the file is the revision token: GitHub rejects a content
//! write whose `sha` no longer matches, which surfaces as a revision conflict.

use std::sync::Arc;

use async_trait::async_trait;
use sitedrop_core::types::{ApiKeyMap, Revision, VersionedKeys};
use sitedrop_core::{ApiKeyStore, CoreError, CoreResult};
use sitedrop_provider::{ProviderError, PutFileRequest, SourceControlHost};

pub struct GithubApiKeyStore {
    host: Arc<dyn SourceControlHost>,
    repo: String,
    path: String,
}

impl GithubApiKeyStore {
    pub fn new(host: Arc<dyn SourceControlHost>, repo: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host,
            repo: repo.into(),
            path: path.into(),
        }
    }

    fn location(&self) -> String {
        format!("{}/{}", self.repo, self.path)
    }
}

#[async_trait]
impl ApiKeyStore for GithubApiKeyStore {
    async fn read(&self) -> CoreResult<VersionedKeys> {
        let Some(file) = self.host.get_file(&self.repo, &self.path).await? else {
            tracing::debug!("Key document {} does not exist yet", self.location());
            return Ok(VersionedKeys::default());
        };

        let keys = if file.content.iter().all(u8::is_ascii_whitespace) {
            ApiKeyMap::new()
        } else {
            serde_json::from_slice(&file.content).map_err(|e| {
                CoreError::SerializationError(format!(
                    "Key document {} is not valid: {e}",
                    self.location()
                ))
            })?
        };

        Ok(VersionedKeys {
            keys,
            revision: Some(Revision::new(file.sha)),
        })
    }

    async fn write(
        &self,
        keys: &ApiKeyMap,
        expected: Option<&Revision>,
        message: &str,
    ) -> CoreResult<Revision> {
        let content = serde_json::to_vec_pretty(keys)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        let request = PutFileRequest {
            path: self.path.clone(),
            content,
            message: message.to_string(),
            sha: expected.map(|r| r.as_str().to_string()),
        };

        match self.host.put_file(&self.repo, &request).await {
            Ok(sha) => Ok(Revision::new(sha)),
            Err(ProviderError::Conflict { .. }) => Err(CoreError::RevisionConflict(self.location())),
            Err(e) => Err(e.into()),
        }
    }
}
