use super::tts_repository::TtsRepository;
use crate::domain::tts::VoiceConfig;
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, TextType, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly implementation of TTS repository.
///
/// Speaking rate and volume gain are applied through SSML prosody since
/// Polly has no request fields for them.
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    fn voice_for(voice: &VoiceConfig) -> &'static str {
        match voice.primary_language().as_str() {
            "es" => "Lucia",
            "fr" => "Lea",
            "de" => "Vicki",
            "it" => "Bianca",
            "pt" => "Ines",
            "ko" => "Seoyeon",
            _ => "Joanna",
        }
    }

    fn build_ssml(text: &str, voice: &VoiceConfig) -> String {
        let rate = (voice.speaking_rate * 100.0).round() as i32;
        let volume = if voice.volume_gain_db >= 0.0 {
            format!("+{}dB", voice.volume_gain_db)
        } else {
            format!("{}dB", voice.volume_gain_db)
        };

        format!(
            "<speak><prosody rate=\"{}%\" volume=\"{}\">{}</prosody></speak>",
            rate,
            volume,
            escape_xml(text)
        )
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(&self, text: &str, voice: &VoiceConfig) -> Result<Vec<u8>, String> {
        let voice_name = Self::voice_for(voice);
        let voice_id = VoiceId::from(voice_name);
        let engine = Engine::Neural;

        tracing::debug!(
            language = %voice.language_code,
            voice = voice_name,
            engine = ?engine,
            text_length = text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(Self::build_ssml(text, voice))
            .text_type(TextType::Ssml)
            .voice_id(voice_id)
            .output_format(OutputFormat::Mp3)
            .sample_rate("24000")
            .engine(engine)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    language = %voice.language_code,
                    voice = voice_name,
                    "AWS Polly synthesize_speech failed"
                );
                format!("AWS Polly error: {}", e)
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            format!("Failed to read audio stream: {}", e)
        })?;

        Ok(audio_stream.into_bytes().to_vec())
    }

    fn provider_name(&self) -> &'static str {
        "polly"
    }
}
