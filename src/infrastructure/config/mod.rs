use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Storage
    pub storage_environment_prefix: String,
    pub storage_backend: StorageBackend,
    pub media_root: PathBuf,
    pub media_url: String,
    pub storage_bucket: String,
    pub supabase_url: Option<String>,
    pub supabase_service_role_key: Option<String>,
    pub s3_endpoint_url: Option<String>,
    pub s3_access_key_id: Option<String>,
    pub s3_secret_access_key: Option<String>,
    pub s3_region: String,
    pub signed_url_ttl_secs: u64,
    pub signing_timeout_secs: u64,
    // TTS
    pub tts_provider: TtsProvider,
    pub google_tts_api_key: Option<String>,
    pub google_tts_endpoint: Option<String>,
    pub aws_region: String,
    pub tts_language: String,
    pub tts_speaking_rate: f32,
    pub tts_volume_gain_db: f32,
    pub tts_max_attempts: u32,
    pub tts_retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        }
    }

    /// Storage namespace used when none is configured explicitly
    pub fn storage_prefix(&self) -> &'static str {
        match self {
            Environment::Development => "local",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StorageBackend {
    Local,
    S3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TtsProvider {
    Google,
    Polly,
}

/// Served by this process under the same path
pub const DEFAULT_MEDIA_URL: &str = "/media";

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let environment =
            Environment::parse(&env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()));

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment,
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            storage_environment_prefix: optional_var("STORAGE_ENVIRONMENT_PREFIX")
                .unwrap_or_else(|| environment.storage_prefix().to_string()),
            storage_backend: match env::var("STORAGE_BACKEND")
                .unwrap_or_else(|_| "local".to_string())
                .to_lowercase()
                .as_str()
            {
                "local" => StorageBackend::Local,
                "s3" => StorageBackend::S3,
                other => return Err(format!("Unknown STORAGE_BACKEND '{}'", other).into()),
            },
            media_root: PathBuf::from(env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string())),
            media_url: env::var("MEDIA_URL").unwrap_or_else(|_| DEFAULT_MEDIA_URL.to_string()),
            storage_bucket: env::var("STORAGE_BUCKET").unwrap_or_else(|_| "media".to_string()),
            supabase_url: optional_var("SUPABASE_URL"),
            supabase_service_role_key: optional_var("SUPABASE_SERVICE_ROLE_KEY"),
            s3_endpoint_url: optional_var("S3_ENDPOINT_URL"),
            s3_access_key_id: optional_var("S3_ACCESS_KEY_ID"),
            s3_secret_access_key: optional_var("S3_SECRET_ACCESS_KEY"),
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            signed_url_ttl_secs: env::var("SIGNED_URL_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()?,
            signing_timeout_secs: env::var("SIGNING_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            tts_provider: match env::var("TTS_PROVIDER")
                .unwrap_or_else(|_| "google".to_string())
                .to_lowercase()
                .as_str()
            {
                "google" => TtsProvider::Google,
                "polly" => TtsProvider::Polly,
                other => return Err(format!("Unknown TTS_PROVIDER '{}'", other).into()),
            },
            google_tts_api_key: optional_var("GOOGLE_TTS_API_KEY"),
            google_tts_endpoint: optional_var("GOOGLE_TTS_ENDPOINT"),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            tts_language: env::var("TTS_LANGUAGE").unwrap_or_else(|_| "es".to_string()),
            tts_speaking_rate: env::var("TTS_SPEAKING_RATE")
                .unwrap_or_else(|_| "0.8".to_string())
                .parse()?,
            tts_volume_gain_db: env::var("TTS_VOLUME_GAIN_DB")
                .unwrap_or_else(|_| "3.0".to_string())
                .parse()?,
            tts_max_attempts: env::var("TTS_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()?,
            tts_retry_backoff_ms: env::var("TTS_RETRY_BACKOFF_MS")
                .unwrap_or_else(|_| "250".to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_secs)
    }

    pub fn signing_timeout(&self) -> Duration {
        Duration::from_secs(self.signing_timeout_secs)
    }

    pub fn tts_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.tts_retry_backoff_ms)
    }

    /// Explicit endpoint, or the S3-compatible endpoint of the Supabase
    /// project. Always ends in `/` so path-style bucket paths append cleanly.
    pub fn resolved_s3_endpoint(&self) -> Option<String> {
        self.s3_endpoint_url
            .as_deref()
            .map(|url| format!("{}/", url.trim_end_matches('/')))
            .or_else(|| {
                self.supabase_url
                    .as_ref()
                    .map(|url| format!("{}/storage/v1/s3/", url.trim_end_matches('/')))
            })
    }
}
