use super::{validate_ttl, SignedUrl, StorageError, StorageKey, DEFAULT_SIGNED_URL_TTL};
use crate::infrastructure::repositories::StorageRepository;
use std::sync::Arc;
use std::time::Duration;

/// Saves, loads and deletes artifacts under environment-prefixed keys and
/// hands out time-limited URLs for them.
#[derive(Clone)]
pub struct ContentPersister {
    storage: Arc<dyn StorageRepository>,
    environment_prefix: String,
    default_ttl: Duration,
}

impl ContentPersister {
    pub fn new(storage: Arc<dyn StorageRepository>, environment_prefix: impl Into<String>) -> Self {
        Self {
            storage,
            environment_prefix: environment_prefix.into(),
            default_ttl: DEFAULT_SIGNED_URL_TTL,
        }
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn environment_prefix(&self) -> &str {
        &self.environment_prefix
    }

    pub fn backend_name(&self) -> &'static str {
        self.storage.backend_name()
    }

    pub fn key_for(&self, name: &str) -> Result<StorageKey, StorageError> {
        StorageKey::namespaced(&self.environment_prefix, name)
    }

    /// Write `bytes` under the prefixed form of `logical_name`.
    ///
    /// Existing objects are never overwritten. A failed write removes whatever
    /// partial object may have been left behind before reporting the error.
    pub async fn save(
        &self,
        logical_name: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StorageKey, StorageError> {
        let key = self.key_for(logical_name)?;

        if self.storage.exists(&key).await? {
            tracing::warn!(storage_key = %key, "Refusing to overwrite existing artifact");
            return Err(StorageError::AlreadyExists(key.to_string()));
        }

        if let Err(e) = self.storage.save(&key, bytes, content_type).await {
            tracing::error!(
                storage_key = %key,
                backend = self.storage.backend_name(),
                error = %e,
                "Failed to save artifact"
            );
            if let Err(cleanup) = self.storage.delete(&key).await {
                tracing::warn!(
                    storage_key = %key,
                    error = %cleanup,
                    "Failed to clean up after unsuccessful save"
                );
            }
            return Err(e);
        }

        tracing::info!(
            storage_key = %key,
            backend = self.storage.backend_name(),
            size_bytes = bytes.len(),
            "Artifact saved"
        );

        Ok(key)
    }

    pub async fn load(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let key = self.key_for(name)?;
        self.storage.load(&key).await
    }

    /// Deleting a key that does not exist succeeds.
    pub async fn delete(&self, name: &str) -> Result<(), StorageError> {
        let key = self.key_for(name)?;
        self.storage.delete(&key).await?;
        tracing::info!(storage_key = %key, "Artifact deleted");
        Ok(())
    }

    pub async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        let key = self.key_for(name)?;
        self.storage.exists(&key).await
    }

    pub async fn url(&self, name: &str, ttl: Option<Duration>) -> Result<SignedUrl, StorageError> {
        let key = self.key_for(name)?;
        let ttl = validate_ttl(ttl.unwrap_or(self.default_ttl))?;
        Ok(self.storage.url(&key, ttl).await?)
    }

    /// Round-trip to the backend without touching any real artifact
    pub async fn probe(&self) -> Result<(), StorageError> {
        self.exists(".readiness-probe").await.map(|_| ())
    }
}
