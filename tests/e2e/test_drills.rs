use crate::e2e::helpers;

use async_trait::async_trait;
use drilltape_backend::domain::storage::{SignedUrl, SigningError, StorageError, StorageKey};
use drilltape_backend::infrastructure::repositories::{LocalStorageRepository, StorageRepository};
use helpers::{api_client::TestClient, spawn_app, ScriptedTtsRepository, TestContext, FAIL_MARKER};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use test_context::test_context;

fn ledger(body: &Value) -> &Vec<Value> {
    body.get("sync_ledger")
        .and_then(|v| v.as_array())
        .expect("Missing sync_ledger")
}

fn start_end(entry: &Value) -> (f64, f64) {
    (
        entry.get("start").and_then(|v| v.as_f64()).unwrap(),
        entry.get("end").and_then(|v| v.as_f64()).unwrap(),
    )
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_render_drill_from_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/drills",
            &json!({
                "title": "Greetings Lesson",
                "text": "Hola\nHello\n\nBuenos días\nGood morning\n"
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let body = response.body.as_ref().unwrap();

    let key = body.get("artifact_key").and_then(|v| v.as_str()).unwrap();
    assert!(key.starts_with("local/audios/greetings-lesson-"), "key was {}", key);
    assert!(key.ends_with(".mp3"));
    assert!(ctx.artifact_path(key).is_file());

    let entries = ledger(body);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].get("text").and_then(|v| v.as_str()), Some("Hola"));
    assert_eq!(
        entries[1].get("translation").and_then(|v| v.as_str()),
        Some("Good morning")
    );

    let (first_start, first_end) = start_end(&entries[0]);
    let (second_start, second_end) = start_end(&entries[1]);
    assert_eq!(first_start, 0.0);
    assert!(first_end > 4.0, "three repetitions plus padding");
    assert!((second_start - first_end - 2.0).abs() < 1e-9);

    let total = body.get("total_duration_sec").and_then(|v| v.as_f64()).unwrap();
    assert!((total - second_end).abs() < 1e-9);
    assert_eq!(body.get("failed_sentences"), Some(&json!([])));

    // Default language preset
    assert_eq!(
        ctx.tts.calls(),
        vec![
            ("Hola".to_string(), "es-ES".to_string()),
            ("Buenos días".to_string(), "es-ES".to_string()),
        ]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_render_explicit_pairs_with_requested_language(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/drills",
            &json!({
                "pairs": [{ "text": "안녕하세요", "translation": "Hello" }],
                "language": "ko"
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);

    let key = response.body.as_ref().unwrap()["artifact_key"].as_str().unwrap().to_string();
    assert!(key.starts_with("local/audios/audio-"), "untitled drills use the fallback stem");
    assert_eq!(ctx.tts.calls()[0].1, "ko-KR");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_skip_failed_sentence_and_keep_its_slot(ctx: &TestContext) {
    let failing = format!("Dos {}", FAIL_MARKER);
    let response = ctx
        .client
        .post(
            "/api/drills",
            &json!({
                "title": "partial",
                "pairs": [
                    { "text": "Uno", "translation": "One" },
                    { "text": failing, "translation": "Two" },
                    { "text": "Tres", "translation": "Three" }
                ]
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let body = response.body.as_ref().unwrap();

    assert_eq!(body.get("failed_sentences"), Some(&json!([1])));

    let entries = ledger(body);
    assert_eq!(entries.len(), 3);
    for entry in entries {
        // Wire shape is exactly text, translation, start, end
        assert_eq!(entry.as_object().unwrap().len(), 4);
    }

    let (_, first_end) = start_end(&entries[0]);
    let (failed_start, failed_end) = start_end(&entries[1]);
    let (third_start, _) = start_end(&entries[2]);
    assert_eq!(failed_start, failed_end);
    assert!((failed_start - first_end - 2.0).abs() < 1e-9);
    assert!((third_start - failed_end - 2.0).abs() < 1e-9);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_input(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/drills", &json!({ "title": "nothing", "text": "\n\n  \n" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("at least one sentence");
    assert!(ctx.tts.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_blank_pairs_before_synthesis(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/drills",
            &json!({
                "pairs": [
                    { "text": "Uno", "translation": "One" },
                    { "text": "   ", "translation": "Two" }
                ]
            }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("pair 1");
    assert!(ctx.tts.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_store_anything_when_every_sentence_fails(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/drills",
            &json!({
                "pairs": [
                    { "text": format!("a {}", FAIL_MARKER), "translation": "A" },
                    { "text": format!("b {}", FAIL_MARKER), "translation": "B" }
                ]
            }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_error_message("No sentence produced audio");
    assert!(!ctx.media_root.join("local").exists());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_sign_serve_and_delete_artifact(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/drills",
            &json!({ "title": "lifecycle", "text": "Sí\nYes" }),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::CREATED);
    let key = response.body.as_ref().unwrap()["artifact_key"]
        .as_str()
        .unwrap()
        .to_string();

    let response = ctx
        .client
        .get(&format!("/api/drills/url?key={}&ttl=120", key))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    let signed: SignedUrl = response.json().unwrap();
    assert_eq!(signed.url, format!("/media/{}", key));

    let served = ctx.client.get(&signed.url).await.unwrap();
    served.assert_status(StatusCode::OK);
    assert_eq!(
        served.body_bytes,
        std::fs::read(ctx.artifact_path(&key)).unwrap()
    );

    let response = ctx
        .client
        .delete(&format!("/api/drills?key={}", key))
        .await
        .unwrap();
    response.assert_status(StatusCode::NO_CONTENT);
    assert!(!ctx.artifact_path(&key).exists());

    // Deleting again is not an error
    let response = ctx
        .client
        .delete(&format!("/api/drills?key={}", key))
        .await
        .unwrap();
    response.assert_status(StatusCode::NO_CONTENT);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_out_of_range_ttl(ctx: &TestContext) {
    for ttl in ["0", "604801", "18446744073709551615"] {
        let response = ctx
            .client
            .get(&format!("/api/drills/url?key=audios/x.mp3&ttl={}", ttl))
            .await
            .unwrap();

        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("ttl must");
    }

    // Not a number at all
    let response = ctx
        .client
        .get("/api/drills/url?key=audios/x.mp3&ttl=soon")
        .await
        .unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_a_week_long_ttl(ctx: &TestContext) {
    let response = ctx
        .client
        .get("/api/drills/url?key=audios/x.mp3&ttl=604800")
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let signed: SignedUrl = response.json().unwrap();
    assert!(signed.expires_at > chrono::Utc::now() + chrono::Duration::days(6));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_traversal_keys(ctx: &TestContext) {
    let response = ctx
        .client
        .get("/api/drills/url?key=../secrets.mp3")
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
}

/// Local storage whose every signing strategy is down
struct UnsignableStorage {
    inner: LocalStorageRepository,
}

#[async_trait]
impl StorageRepository for UnsignableStorage {
    fn backend_name(&self) -> &'static str {
        "unsignable"
    }

    async fn save(&self, key: &StorageKey, bytes: &[u8], content_type: &str) -> Result<(), StorageError> {
        self.inner.save(key, bytes, content_type).await
    }

    async fn load(&self, key: &StorageKey) -> Result<Vec<u8>, StorageError> {
        self.inner.load(key).await
    }

    async fn delete(&self, key: &StorageKey) -> Result<(), StorageError> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &StorageKey) -> Result<bool, StorageError> {
        self.inner.exists(key).await
    }

    async fn url(&self, _key: &StorageKey, _ttl: Duration) -> Result<SignedUrl, SigningError> {
        Err(SigningError::Exhausted(vec![
            "supabase: HTTP 500".to_string(),
            "s3-presign: missing credentials".to_string(),
        ]))
    }
}

#[tokio::test]
async fn it_should_return_503_when_no_url_can_be_signed() {
    let media_dir = TempDir::new().unwrap();
    let storage = Arc::new(UnsignableStorage {
        inner: LocalStorageRepository::new(media_dir.path(), "/media"),
    });
    let base_url = spawn_app(
        Arc::new(ScriptedTtsRepository::default()),
        storage,
        media_dir.path(),
    )
    .await;
    let client = TestClient::new(&base_url);

    let response = client
        .get("/api/drills/url?key=audios/x.mp3")
        .await
        .unwrap();

    response
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .assert_error_message("access temporarily unavailable");
}
