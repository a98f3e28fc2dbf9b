use super::storage_repository::StorageRepository;
use crate::domain::storage::{SignedUrl, SigningError, StorageError, StorageKey};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Filesystem storage under a media root, served back through a static
/// media URL. URLs are plain links; the TTL only sets `expires_at`.
pub struct LocalStorageRepository {
    media_root: PathBuf,
    media_url: String,
}

impl LocalStorageRepository {
    pub fn new(media_root: impl Into<PathBuf>, media_url: impl Into<String>) -> Self {
        Self {
            media_root: media_root.into(),
            media_url: media_url.into(),
        }
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    fn path_for(&self, key: &StorageKey) -> PathBuf {
        key.as_str()
            .split('/')
            .fold(self.media_root.clone(), |path, segment| path.join(segment))
    }
}

#[async_trait]
impl StorageRepository for LocalStorageRepository {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn save(
        &self,
        key: &StorageKey,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Write(format!("{}: {}", parent.display(), e)))?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::Write(format!("{}: {}", path.display(), e)))
    }

    async fn load(&self, key: &StorageKey) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(key);
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
            _ => StorageError::Read(format!("{}: {}", path.display(), e)),
        })
    }

    async fn delete(&self, key: &StorageKey) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Delete(format!("{}: {}", path.display(), e))),
        }
    }

    async fn exists(&self, key: &StorageKey) -> Result<bool, StorageError> {
        tokio::fs::try_exists(self.path_for(key))
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }

    async fn url(&self, key: &StorageKey, ttl: Duration) -> Result<SignedUrl, SigningError> {
        let url = format!("{}/{}", self.media_url.trim_end_matches('/'), key);
        Ok(SignedUrl::expiring_in(url, ttl))
    }
}
