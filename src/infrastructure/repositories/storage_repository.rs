use crate::domain::storage::{SignedUrl, SigningError, StorageError, StorageKey};
use async_trait::async_trait;
use std::time::Duration;

/// Object store holding finished artifacts.
///
/// Keys arrive already namespaced; implementations store them verbatim.
#[async_trait]
pub trait StorageRepository: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn save(
        &self,
        key: &StorageKey,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError>;

    async fn load(&self, key: &StorageKey) -> Result<Vec<u8>, StorageError>;

    /// Missing objects are not an error
    async fn delete(&self, key: &StorageKey) -> Result<(), StorageError>;

    async fn exists(&self, key: &StorageKey) -> Result<bool, StorageError>;

    async fn url(&self, key: &StorageKey, ttl: Duration) -> Result<SignedUrl, SigningError>;
}
