pub mod service;
pub mod voice;

use crate::domain::audio::PcmClip;
pub use service::SpeechSynthesizer;
pub use voice::VoiceConfig;

/// Outcome of synthesizing one sentence. Every sentence gets exactly one.
#[derive(Debug, Clone)]
pub enum SynthesisResult {
    Success {
        /// MP3 bytes exactly as the provider returned them
        audio_bytes: Vec<u8>,
        /// The same audio decoded to mono PCM at the master rate
        clip: PcmClip,
    },
    Failed {
        reason: String,
    },
}

impl SynthesisResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SynthesisResult::Success { .. })
    }

    pub fn clip(&self) -> Option<&PcmClip> {
        match self {
            SynthesisResult::Success { clip, .. } => Some(clip),
            SynthesisResult::Failed { .. } => None,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.clip().map(PcmClip::duration_ms).unwrap_or(0)
    }
}
