use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drilltape_backend::controllers::drill::{DrillController, VoiceDefaults};
use drilltape_backend::domain::drill::DrillService;
use drilltape_backend::domain::storage::{ContentPersister, SignedUrlResolver};
use drilltape_backend::domain::tts::SpeechSynthesizer;
use drilltape_backend::infrastructure::config::{Config, LogFormat, StorageBackend, TtsProvider};
use drilltape_backend::infrastructure::http::{build_router, start_http_server, MediaMount};
use drilltape_backend::infrastructure::repositories::s3_storage_repository::build_s3_client;
use drilltape_backend::infrastructure::repositories::{
    GoogleTtsRepository, LocalStorageRepository, PollyTtsRepository, S3PresignUrlSigner,
    S3StorageRepository, StorageRepository, SupabaseUrlSigner, TtsRepository, UrlSigner,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        storage_prefix = %config.storage_environment_prefix,
        "Starting DrillTape Backend on {}:{}",
        config.host,
        config.port
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. TTS provider
    let tts_repo = build_tts_repository(&config).await?;
    tracing::info!(provider = tts_repo.provider_name(), "TTS provider initialized");

    // 2. Storage backend
    let (storage, media) = build_storage(&config)?;
    tracing::info!(backend = storage.backend_name(), "Storage backend initialized");

    // 3. Services
    let synthesizer = Arc::new(
        SpeechSynthesizer::new(tts_repo)
            .with_retry(config.tts_max_attempts, config.tts_retry_backoff()),
    );
    let persister = Arc::new(
        ContentPersister::new(storage, config.storage_environment_prefix.clone())
            .with_default_ttl(config.signed_url_ttl()),
    );
    let drill_service = Arc::new(DrillService::new(synthesizer, persister.clone()));

    // 4. Controllers
    let drill_controller = Arc::new(DrillController::new(
        drill_service,
        VoiceDefaults {
            language: config.tts_language.clone(),
            speaking_rate: config.tts_speaking_rate,
            volume_gain_db: config.tts_volume_gain_db,
        },
    ));

    let app = build_router(drill_controller, persister, media);
    start_http_server(config, app).await?;

    Ok(())
}

async fn build_tts_repository(
    config: &Config,
) -> Result<Arc<dyn TtsRepository>, Box<dyn std::error::Error>> {
    match config.tts_provider {
        TtsProvider::Google => {
            let api_key = config
                .google_tts_api_key
                .clone()
                .ok_or("GOOGLE_TTS_API_KEY is required when TTS_PROVIDER=google")?;
            let mut repo = GoogleTtsRepository::new(api_key)?;
            if let Some(endpoint) = &config.google_tts_endpoint {
                repo = repo.with_endpoint(endpoint.clone());
            }
            Ok(Arc::new(repo))
        }
        TtsProvider::Polly => {
            tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);
            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
            Ok(Arc::new(PollyTtsRepository::new(polly_client)))
        }
    }
}

fn build_storage(
    config: &Config,
) -> Result<(Arc<dyn StorageRepository>, Option<MediaMount>), Box<dyn std::error::Error>> {
    match config.storage_backend {
        StorageBackend::Local => {
            let storage = LocalStorageRepository::new(&config.media_root, config.media_url.clone());
            let media = config.media_url.starts_with('/').then(|| MediaMount {
                route: config.media_url.trim_end_matches('/').to_string(),
                root: config.media_root.clone(),
            });
            Ok((Arc::new(storage), media))
        }
        StorageBackend::S3 => {
            let endpoint = config
                .resolved_s3_endpoint()
                .ok_or("S3_ENDPOINT_URL or SUPABASE_URL is required when STORAGE_BACKEND=s3")?;
            let access_key = config
                .s3_access_key_id
                .clone()
                .ok_or("S3_ACCESS_KEY_ID is required when STORAGE_BACKEND=s3")?;
            let secret_key = config
                .s3_secret_access_key
                .clone()
                .ok_or("S3_SECRET_ACCESS_KEY is required when STORAGE_BACKEND=s3")?;

            let s3_client = build_s3_client(&endpoint, config.s3_region.clone(), access_key, secret_key);
            tracing::info!(endpoint = %endpoint, bucket = %config.storage_bucket, "S3 client initialized");

            let mut signers: Vec<Arc<dyn UrlSigner>> = Vec::new();
            match (&config.supabase_url, &config.supabase_service_role_key) {
                (Some(url), Some(key)) => signers.push(Arc::new(SupabaseUrlSigner::new(
                    url.clone(),
                    key.clone(),
                    config.storage_bucket.clone(),
                    config.signing_timeout(),
                )?)),
                _ => tracing::warn!(
                    "SUPABASE_URL or SUPABASE_SERVICE_ROLE_KEY missing, signing with S3 presign only"
                ),
            }
            signers.push(Arc::new(S3PresignUrlSigner::new(
                s3_client.clone(),
                config.storage_bucket.clone(),
            )));

            let storage = S3StorageRepository::new(
                s3_client,
                config.storage_bucket.clone(),
                SignedUrlResolver::new(signers),
            );
            Ok((Arc::new(storage), None))
        }
    }
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "drilltape_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
