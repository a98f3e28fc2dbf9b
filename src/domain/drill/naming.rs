use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

const ARTIFACT_DIR: &str = "audios";
const FALLBACK_STEM: &str = "audio";
const UNIQUE_SUFFIX_LEN: usize = 8;

fn non_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s-]").expect("static pattern"))
}

fn separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-\s]+").expect("static pattern"))
}

/// Lowercase, drop punctuation, join words with `-`
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let cleaned = non_word().replace_all(&lowered, "");
    separators()
        .replace_all(cleaned.trim(), "-")
        .trim_matches(|c| c == '-' || c == '_')
        .to_string()
}

/// Logical storage name for a new drill artifact:
/// `audios/{slug}-{unix}-{8 hex}.mp3`. The random suffix keeps two renders of
/// the same title within one second apart.
pub fn artifact_name(title: Option<&str>, now: DateTime<Utc>) -> String {
    let slug = title.map(slugify).unwrap_or_default();
    let stem = if slug.is_empty() { FALLBACK_STEM } else { &slug };
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}/{}-{}-{}.mp3",
        ARTIFACT_DIR,
        stem,
        now.timestamp(),
        &suffix[..UNIQUE_SUFFIX_LEN]
    )
}
