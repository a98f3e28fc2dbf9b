use serde::{Deserialize, Serialize};

/// Slightly slower than natural speech so learners can follow along
pub const DEFAULT_SPEAKING_RATE: f32 = 0.8;
pub const DEFAULT_VOLUME_GAIN_DB: f32 = 3.0;

/// Voice parameters for one synthesis run. Chosen once from a language code
/// and never mutated while the run is in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// BCP-47 code sent to the provider (e.g. `es-ES`)
    pub language_code: String,
    /// Provider voice name; `None` lets the provider pick for the language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_name: Option<String>,
    pub speaking_rate: f32,
    pub volume_gain_db: f32,
}

impl VoiceConfig {
    /// Look up the preset voice for a short language code (`es`, `ko`, ...).
    ///
    /// Unknown codes get a generic voice that only carries the language code.
    pub fn for_language(code: &str) -> Self {
        let code = code.trim();
        let (language_code, voice_name) = match code.to_lowercase().as_str() {
            "es" => ("es-ES".to_string(), Some("es-ES-Wavenet-D".to_string())),
            "ko" => ("ko-KR".to_string(), Some("ko-KR-Wavenet-A".to_string())),
            _ => (code.to_string(), None),
        };

        Self {
            language_code,
            voice_name,
            speaking_rate: DEFAULT_SPEAKING_RATE,
            volume_gain_db: DEFAULT_VOLUME_GAIN_DB,
        }
    }

    pub fn with_speaking_rate(mut self, speaking_rate: f32) -> Self {
        self.speaking_rate = speaking_rate;
        self
    }

    pub fn with_volume_gain_db(mut self, volume_gain_db: f32) -> Self {
        self.volume_gain_db = volume_gain_db;
        self
    }

    /// Primary language subtag, e.g. `es` for `es-ES`
    pub fn primary_language(&self) -> String {
        self.language_code
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

impl std::fmt::Display for VoiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.voice_name {
            Some(name) => write!(f, "{} ({})", self.language_code, name),
            None => write!(f, "{}", self.language_code),
        }
    }
}
