pub mod error;
pub mod key;
pub mod persister;
pub mod resolver;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::{SigningError, StorageError};
pub use key::StorageKey;
pub use persister::ContentPersister;
pub use resolver::SignedUrlResolver;

/// Default lifetime of a signed URL
pub const DEFAULT_SIGNED_URL_TTL: Duration = Duration::from_secs(3600);

/// Longest lifetime a signed URL may have; SigV4 presigning stops at a week
pub const MAX_SIGNED_URL_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

impl SignedUrl {
    /// Expiry saturates at the latest representable instant instead of
    /// wrapping.
    pub fn expiring_in(url: impl Into<String>, ttl: Duration) -> Self {
        let expires_at = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            url: url.into(),
            expires_at,
        }
    }
}

/// Rejects lifetimes that are zero or longer than [`MAX_SIGNED_URL_TTL`]
pub fn validate_ttl(ttl: Duration) -> Result<Duration, StorageError> {
    if ttl.is_zero() {
        return Err(StorageError::InvalidTtl("ttl must be positive".to_string()));
    }
    if ttl > MAX_SIGNED_URL_TTL {
        return Err(StorageError::InvalidTtl(format!(
            "ttl must not exceed {} seconds",
            MAX_SIGNED_URL_TTL.as_secs()
        )));
    }
    Ok(ttl)
}
