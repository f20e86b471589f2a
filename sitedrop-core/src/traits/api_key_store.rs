//! API key document store abstraction

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::types::{ApiKeyMap, Revision, VersionedKeys};

/// Optimistic-concurrency store for the API key document.
///
/// Platform implementations:
/// - Web: `GithubApiKeyStore` (JSON file in a configuration repository)
/// - Tests: [`InMemoryApiKeyStore`]
#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    /// Reads the whole document with its revision.
    ///
    /// A missing document reads as an empty map with no revision.
    async fn read(&self) -> CoreResult<VersionedKeys>;

    /// Replaces the document.
    ///
    /// `expected` is the revision returned by the [`read`](Self::read) the
    /// change was based on (`None` when the document did not exist). Fails with
    /// [`CoreError::RevisionConflict`] when the stored revision moved on.
    ///
    /// # Returns
    /// The new revision.
    async fn write(
        &self,
        keys: &ApiKeyMap,
        expected: Option<&Revision>,
        message: &str,
    ) -> CoreResult<Revision>;
}

/// In-memory key store with a monotonically increasing revision.
#[derive(Default)]
pub struct InMemoryApiKeyStore {
    state: RwLock<(ApiKeyMap, u64)>,
}

impl InMemoryApiKeyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `keys` at revision 1.
    #[must_use]
    pub fn with_keys(keys: ApiKeyMap) -> Self {
        Self {
            state: RwLock::new((keys, 1)),
        }
    }

    fn revision_of(counter: u64) -> Option<Revision> {
        (counter > 0).then(|| Revision::new(counter.to_string()))
    }
}

#[async_trait]
impl ApiKeyStore for InMemoryApiKeyStore {
    async fn read(&self) -> CoreResult<VersionedKeys> {
        let state = self.state.read().await;
        Ok(VersionedKeys {
            keys: state.0.clone(),
            revision: Self::revision_of(state.1),
        })
    }

    async fn write(
        &self,
        keys: &ApiKeyMap,
        expected: Option<&Revision>,
        message: &str,
    ) -> CoreResult<Revision> {
        let mut state = self.state.write().await;
        if Self::revision_of(state.1).as_ref() != expected {
            return Err(CoreError::RevisionConflict("api keys".to_string()));
        }
        state.0 = keys.clone();
        state.1 += 1;
        log::debug!("Key document written at revision {}: {message}", state.1);
        Ok(Revision::new(state.1.to_string()))
    }
}
