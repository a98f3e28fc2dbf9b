use super::error::SigningError;
use super::SignedUrl;
use crate::infrastructure::repositories::UrlSigner;
use std::sync::Arc;
use std::time::Duration;

/// Tries each signing strategy in order and returns the first URL produced.
///
/// Nothing is cached: every call signs again.
#[derive(Clone)]
pub struct SignedUrlResolver {
    signers: Vec<Arc<dyn UrlSigner>>,
}

impl SignedUrlResolver {
    pub fn new(signers: Vec<Arc<dyn UrlSigner>>) -> Self {
        Self { signers }
    }

    pub fn strategies(&self) -> Vec<&'static str> {
        self.signers.iter().map(|s| s.name()).collect()
    }

    pub async fn resolve(&self, key: &str, ttl: Duration) -> Result<SignedUrl, SigningError> {
        let mut causes = Vec::with_capacity(self.signers.len());

        for (position, signer) in self.signers.iter().enumerate() {
            match signer.sign(key, ttl).await {
                Ok(signed) => {
                    if position > 0 {
                        tracing::info!(
                            storage_key = key,
                            strategy = signer.name(),
                            "Signed URL produced by fallback strategy"
                        );
                    }
                    return Ok(signed);
                }
                Err(reason) => {
                    tracing::warn!(
                        storage_key = key,
                        strategy = signer.name(),
                        error = %reason,
                        "URL signing strategy failed"
                    );
                    causes.push(format!("{}: {}", signer.name(), reason));
                }
            }
        }

        if causes.is_empty() {
            causes.push("no signing strategy configured".to_string());
        }

        tracing::error!(
            storage_key = key,
            causes = ?causes,
            "All URL signing strategies failed"
        );
        Err(SigningError::Exhausted(causes))
    }
}
