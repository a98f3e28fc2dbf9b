use super::storage_repository::StorageRepository;
use crate::domain::storage::{SignedUrl, SignedUrlResolver, SigningError, StorageError, StorageKey};
use async_trait::async_trait;
use aws_sdk_s3::{
    config::{BehaviorVersion, Credentials, Region},
    primitives::ByteStream,
    Client as S3Client,
};
use std::sync::Arc;
use std::time::Duration;

/// Path-style client for an S3-compatible endpoint.
///
/// The endpoint always gets a trailing `/`: path-style addressing appends the
/// bucket straight onto the endpoint path, so `.../s3` would address
/// `.../s3media/...` instead of `.../s3/media/...`.
pub fn build_s3_client(
    endpoint: &str,
    region: impl Into<String>,
    access_key_id: impl Into<String>,
    secret_access_key: impl Into<String>,
) -> Arc<S3Client> {
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(region.into()))
        .credentials_provider(Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "drilltape-env",
        ))
        .endpoint_url(with_trailing_slash(endpoint))
        .force_path_style(true)
        .build();
    Arc::new(S3Client::from_conf(config))
}

pub(crate) fn with_trailing_slash(endpoint: &str) -> String {
    format!("{}/", endpoint.trim_end_matches('/'))
}

/// S3-compatible bucket storage. URLs come from the signer chain, in order.
pub struct S3StorageRepository {
    s3_client: Arc<S3Client>,
    bucket: String,
    resolver: SignedUrlResolver,
}

impl S3StorageRepository {
    pub fn new(s3_client: Arc<S3Client>, bucket: impl Into<String>, resolver: SignedUrlResolver) -> Self {
        Self {
            s3_client,
            bucket: bucket.into(),
            resolver,
        }
    }
}

#[async_trait]
impl StorageRepository for S3StorageRepository {
    fn backend_name(&self) -> &'static str {
        "s3"
    }

    async fn save(
        &self,
        key: &StorageKey,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .content_type(content_type)
            .body(ByteStream::from(bytes.to_vec()))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, bucket = %self.bucket, storage_key = %key, "S3 put_object failed");
                StorageError::Write(e.to_string())
            })?;
        Ok(())
    }

    async fn load(&self, key: &StorageKey) -> Result<Vec<u8>, StorageError> {
        let output = self
            .s3_client
            .get_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().map(|se| se.is_no_such_key()).unwrap_or(false) {
                    StorageError::NotFound(key.to_string())
                } else {
                    StorageError::Read(e.to_string())
                }
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Read(e.to_string()))?;
        Ok(body.into_bytes().to_vec())
    }

    async fn delete(&self, key: &StorageKey) -> Result<(), StorageError> {
        self.s3_client
            .delete_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| StorageError::Delete(e.to_string()))?;
        Ok(())
    }

    async fn exists(&self, key: &StorageKey) -> Result<bool, StorageError> {
        match self
            .s3_client
            .head_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().map(|se| se.is_not_found()).unwrap_or(false) => {
                Ok(false)
            }
            Err(e) => Err(StorageError::Unavailable(e.to_string())),
        }
    }

    async fn url(&self, key: &StorageKey, ttl: Duration) -> Result<SignedUrl, SigningError> {
        self.resolver.resolve(key.as_str(), ttl).await
    }
}
