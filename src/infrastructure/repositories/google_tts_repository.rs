use super::tts_repository::TtsRepository;
use crate::domain::tts::VoiceConfig;
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use std::time::Duration;

pub const GOOGLE_TTS_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

const OUTPUT_SAMPLE_RATE_HZ: u32 = 24_000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct SynthesizeResponse {
    #[serde(rename = "audioContent")]
    audio_content: String,
}

/// Google Cloud Text-to-Speech over its REST API, authenticated with an
/// API key.
pub struct GoogleTtsRepository {
    http_client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GoogleTtsRepository {
    pub fn new(api_key: impl Into<String>) -> Result<Self, String> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            endpoint: GOOGLE_TTS_ENDPOINT.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_request_body(text: &str, voice: &VoiceConfig) -> serde_json::Value {
        let mut voice_params = serde_json::json!({
            "languageCode": voice.language_code,
        });
        if let Some(name) = &voice.voice_name {
            voice_params["name"] = serde_json::Value::String(name.clone());
        }

        serde_json::json!({
            "input": { "text": text },
            "voice": voice_params,
            "audioConfig": {
                "audioEncoding": "MP3",
                "speakingRate": voice.speaking_rate,
                "volumeGainDb": voice.volume_gain_db,
                "sampleRateHertz": OUTPUT_SAMPLE_RATE_HZ,
            }
        })
    }
}

#[async_trait]
impl TtsRepository for GoogleTtsRepository {
    async fn synthesize(&self, text: &str, voice: &VoiceConfig) -> Result<Vec<u8>, String> {
        tracing::debug!(
            endpoint = %self.endpoint,
            voice = %voice,
            text_length = text.len(),
            "Calling Google TTS synthesize"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_request_body(text, voice))
            .send()
            .await
            .map_err(|e| format!("Google TTS request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                voice = %voice,
                "Google TTS returned an error"
            );
            return Err(format!("Google TTS error: HTTP {}", status.as_u16()));
        }

        let payload: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| format!("Invalid Google TTS response: {}", e))?;

        let audio = base64::engine::general_purpose::STANDARD
            .decode(payload.audio_content)
            .map_err(|e| format!("Failed to decode base64 audio: {}", e))?;

        if audio.is_empty() {
            return Err("Google TTS returned no audio".to_string());
        }

        Ok(audio)
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }
}
