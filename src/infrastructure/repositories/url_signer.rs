use crate::domain::storage::SignedUrl;
use async_trait::async_trait;
use std::time::Duration;

/// One way of producing a time-limited URL for a stored object.
#[async_trait]
pub trait UrlSigner: Send + Sync {
    fn name(&self) -> &'static str;

    async fn sign(&self, key: &str, ttl: Duration) -> Result<SignedUrl, String>;
}
