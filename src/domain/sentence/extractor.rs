use super::SentencePair;

/// Split raw drill text into ordered (text, translation) pairs.
///
/// Blank lines are ignored and every remaining line is trimmed. Lines are
/// consumed two at a time in file order; a trailing unpaired line is dropped
/// with a warning.
pub fn extract_sentence_pairs(raw: &str) -> Vec<SentencePair> {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() % 2 != 0 {
        tracing::warn!(
            line_count = lines.len(),
            dropped_line = lines.last().copied().unwrap_or_default(),
            "Odd number of sentence lines, dropping the trailing unpaired line"
        );
    }

    lines
        .chunks_exact(2)
        .map(|pair| SentencePair::new(pair[0], pair[1]))
        .collect()
}
