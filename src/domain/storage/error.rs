#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    #[error("invalid url lifetime: {0}")]
    InvalidTtl(String),
    #[error("artifact already exists: {0}")]
    AlreadyExists(String),
    #[error("could not store artifact: {0}")]
    Write(String),
    #[error("could not read artifact: {0}")]
    Read(String),
    #[error("artifact not found: {0}")]
    NotFound(String),
    #[error("could not delete artifact: {0}")]
    Delete(String),
    #[error("storage backend unreachable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Signing(#[from] SigningError),
}

#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    /// Every configured signing strategy failed; one cause per strategy
    #[error("access temporarily unavailable: {}", .0.join("; "))]
    Exhausted(Vec<String>),
}
