use super::url_signer::UrlSigner;
use crate::domain::storage::SignedUrl;
use async_trait::async_trait;
use aws_sdk_s3::{presigning::PresigningConfig, Client as S3Client};
use std::sync::Arc;
use std::time::Duration;

/// Signs locally with S3 credentials; no network round-trip.
pub struct S3PresignUrlSigner {
    s3_client: Arc<S3Client>,
    bucket: String,
}

impl S3PresignUrlSigner {
    pub fn new(s3_client: Arc<S3Client>, bucket: impl Into<String>) -> Self {
        Self {
            s3_client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl UrlSigner for S3PresignUrlSigner {
    fn name(&self) -> &'static str {
        "s3-presign"
    }

    async fn sign(&self, key: &str, ttl: Duration) -> Result<SignedUrl, String> {
        let config = PresigningConfig::expires_in(ttl)
            .map_err(|e| format!("Invalid presign TTL: {}", e))?;

        let request = self
            .s3_client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(config)
            .await
            .map_err(|e| format!("S3 presign failed: {}", e))?;

        Ok(SignedUrl::expiring_in(request.uri().to_string(), ttl))
    }
}
