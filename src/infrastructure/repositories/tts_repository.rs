use crate::domain::tts::VoiceConfig;
use async_trait::async_trait;

/// Text-to-speech provider.
///
/// One call synthesizes one sentence and returns the provider's MP3 bytes
/// unchanged. Errors are provider messages suitable for logging.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &VoiceConfig) -> Result<Vec<u8>, String>;

    fn provider_name(&self) -> &'static str;
}
