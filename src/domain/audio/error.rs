#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("audio decode failed: {0}")]
    Decode(String),
    #[error("audio encode failed: {0}")]
    Encode(String),
    #[error("empty artifact: no sentence produced audio")]
    EmptyArtifact,
}
