use async_trait::async_trait;
use drilltape_backend::controllers::drill::{DrillController, VoiceDefaults};
use drilltape_backend::domain::audio::{encode_mp3, MASTER_SAMPLE_RATE};
use drilltape_backend::domain::drill::DrillService;
use drilltape_backend::domain::storage::ContentPersister;
use drilltape_backend::domain::tts::{SpeechSynthesizer, VoiceConfig};
use drilltape_backend::infrastructure::http::{build_router, MediaMount};
use drilltape_backend::infrastructure::repositories::{
    LocalStorageRepository, StorageRepository, TtsRepository,
};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;

pub mod api_client;

use api_client::TestClient;

pub const STORAGE_PREFIX: &str = "local";

/// Any sentence containing this marker is rejected by the scripted provider
pub const FAIL_MARKER: &str = "[fail]";

/// Speaks a 300 ms tone per sentence and records what it was asked to say
#[derive(Default)]
pub struct ScriptedTtsRepository {
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedTtsRepository {
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TtsRepository for ScriptedTtsRepository {
    async fn synthesize(&self, text: &str, voice: &VoiceConfig) -> Result<Vec<u8>, String> {
        self.calls
            .lock()
            .push((text.to_string(), voice.language_code.clone()));

        if text.contains(FAIL_MARKER) {
            return Err("scripted provider failure".to_string());
        }

        let tone: Vec<f32> = (0..MASTER_SAMPLE_RATE * 3 / 10)
            .map(|i| (i as f32 * 0.06).sin() * 0.5)
            .collect();
        encode_mp3(&tone, MASTER_SAMPLE_RATE).map_err(|e| e.to_string())
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// Boot the router on an ephemeral port and return its base URL
pub async fn spawn_app(
    tts: Arc<ScriptedTtsRepository>,
    storage: Arc<dyn StorageRepository>,
    media_root: &Path,
) -> String {
    let synthesizer = Arc::new(SpeechSynthesizer::new(tts));
    let persister = Arc::new(ContentPersister::new(storage, STORAGE_PREFIX));
    let drill_service = Arc::new(DrillService::new(synthesizer, persister.clone()));
    let drill_controller = Arc::new(DrillController::new(
        drill_service,
        VoiceDefaults {
            language: "es".to_string(),
            speaking_rate: 0.8,
            volume_gain_db: 3.0,
        },
    ));

    let app = build_router(
        drill_controller,
        persister,
        Some(MediaMount {
            route: "/media".to_string(),
            root: media_root.to_path_buf(),
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub struct TestContext {
    pub client: TestClient,
    pub tts: Arc<ScriptedTtsRepository>,
    pub media_root: PathBuf,
    _media_dir: TempDir,
}

impl TestContext {
    /// Path on disk of a stored artifact key
    pub fn artifact_path(&self, key: &str) -> PathBuf {
        key.split('/')
            .fold(self.media_root.clone(), |path, segment| path.join(segment))
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let media_dir = TempDir::new().expect("Failed to create media dir");
            let media_root = media_dir.path().to_path_buf();

            let tts = Arc::new(ScriptedTtsRepository::default());
            let storage = Arc::new(LocalStorageRepository::new(&media_root, "/media"));
            let base_url = spawn_app(tts.clone(), storage, &media_root).await;

            Self {
                client: TestClient::new(&base_url),
                tts,
                media_root,
                _media_dir: media_dir,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Temp dir is removed on drop
        }
    }
}
