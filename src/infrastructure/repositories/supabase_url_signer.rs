use super::url_signer::UrlSigner;
use crate::domain::storage::SignedUrl;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_SIGNING_TIMEOUT: Duration = Duration::from_secs(10);

const STORAGE_API_PREFIX: &str = "/storage/v1";

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: Option<String>,
}

/// Asks the Supabase storage API to sign a URL with the service-role key.
pub struct SupabaseUrlSigner {
    http_client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseUrlSigner {
    pub fn new(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        bucket: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, String> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            bucket: bucket.into(),
        })
    }

    fn sign_endpoint(&self, key: &str) -> String {
        let encoded_key = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        format!(
            "{}{}/object/sign/{}/{}",
            self.base_url, STORAGE_API_PREFIX, self.bucket, encoded_key
        )
    }

    /// The API answers with a path relative to the project URL that may or
    /// may not include the storage prefix.
    fn absolute_url(&self, signed: &str) -> String {
        if signed.starts_with("http://") || signed.starts_with("https://") {
            return signed.to_string();
        }
        if signed.starts_with(STORAGE_API_PREFIX) {
            return format!("{}{}", self.base_url, signed);
        }
        if signed.starts_with('/') {
            format!("{}{}{}", self.base_url, STORAGE_API_PREFIX, signed)
        } else {
            format!("{}{}/{}", self.base_url, STORAGE_API_PREFIX, signed)
        }
    }
}

#[async_trait]
impl UrlSigner for SupabaseUrlSigner {
    fn name(&self) -> &'static str {
        "supabase"
    }

    async fn sign(&self, key: &str, ttl: Duration) -> Result<SignedUrl, String> {
        let response = self
            .http_client
            .post(self.sign_endpoint(key))
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .json(&serde_json::json!({ "expiresIn": ttl.as_secs() }))
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("HTTP {}: {}", status.as_u16(), body));
        }

        let payload: SignResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid response: {}", e))?;

        let signed = payload
            .signed_url
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "response has no signedURL field".to_string())?;

        Ok(SignedUrl::expiring_in(self.absolute_url(&signed), ttl))
    }
}
