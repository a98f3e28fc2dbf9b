use super::voice::VoiceConfig;
use super::SynthesisResult;
use crate::domain::audio::decode_mp3;
use crate::infrastructure::repositories::TtsRepository;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);
const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(5);

/// Turns one sentence into a [`SynthesisResult`].
///
/// Provider and decode failures never escape as errors: they become
/// `Failed` so the run can continue with the next sentence. One attempt per
/// sentence unless a bounded retry is configured.
pub struct SpeechSynthesizer {
    tts_repo: Arc<dyn TtsRepository>,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl SpeechSynthesizer {
    pub fn new(tts_repo: Arc<dyn TtsRepository>) -> Self {
        Self {
            tts_repo,
            max_attempts: 1,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Allow up to `max_attempts` provider calls per sentence, doubling the
    /// backoff after each failure up to five seconds.
    pub fn with_retry(mut self, max_attempts: u32, retry_backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_backoff = retry_backoff.min(MAX_RETRY_BACKOFF);
        self
    }

    pub fn provider_name(&self) -> &'static str {
        self.tts_repo.provider_name()
    }

    pub async fn synthesize(&self, text: &str, voice: &VoiceConfig) -> SynthesisResult {
        let mut backoff = self.retry_backoff;
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match self.attempt(text, voice).await {
                Ok(result) => return result,
                Err(e) => {
                    tracing::warn!(
                        provider = self.tts_repo.provider_name(),
                        attempt = attempt,
                        max_attempts = self.max_attempts,
                        voice = %voice,
                        text_preview = preview(text),
                        error = %e,
                        "Sentence synthesis attempt failed"
                    );
                    last_error = e;
                }
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(backoff).await;
                backoff = next_backoff(backoff);
            }
        }

        SynthesisResult::Failed { reason: last_error }
    }

    async fn attempt(&self, text: &str, voice: &VoiceConfig) -> Result<SynthesisResult, String> {
        let start_time = std::time::Instant::now();

        let audio_bytes = self.tts_repo.synthesize(text, voice).await?;
        let clip = decode_mp3(&audio_bytes).map_err(|e| e.to_string())?;

        tracing::info!(
            provider = self.tts_repo.provider_name(),
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio_bytes.len(),
            clip_duration_ms = clip.duration_ms(),
            "Sentence synthesized"
        );

        Ok(SynthesisResult::Success { audio_bytes, clip })
    }
}

fn next_backoff(current: Duration) -> Duration {
    current.saturating_mul(2).min(MAX_RETRY_BACKOFF)
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(20) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
