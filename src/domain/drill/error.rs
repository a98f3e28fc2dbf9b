use crate::domain::audio::AudioError;
use crate::domain::storage::{SigningError, StorageError};
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum DrillServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("no sentence pairs to render")]
    EmptyInput,
    #[error("no sentence produced audio")]
    EmptyArtifact,
    #[error("encoding failed: {0}")]
    Encoding(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("artifact not found: {0}")]
    NotFound(String),
    #[error("artifact already exists: {0}")]
    Conflict(String),
    #[error(transparent)]
    AccessUnavailable(SigningError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AudioError> for DrillServiceError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::EmptyArtifact => DrillServiceError::EmptyArtifact,
            other => DrillServiceError::Encoding(other.to_string()),
        }
    }
}

impl From<StorageError> for DrillServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(msg) | StorageError::InvalidTtl(msg) => {
                DrillServiceError::Invalid(msg)
            }
            StorageError::AlreadyExists(key) => DrillServiceError::Conflict(key),
            StorageError::NotFound(key) => DrillServiceError::NotFound(key),
            StorageError::Signing(e) => DrillServiceError::AccessUnavailable(e),
            other => DrillServiceError::Storage(other.to_string()),
        }
    }
}

impl From<DrillServiceError> for AppError {
    fn from(err: DrillServiceError) -> Self {
        match err {
            DrillServiceError::Invalid(msg) => AppError::BadRequest(msg),
            DrillServiceError::EmptyInput => {
                AppError::BadRequest("No sentence pairs to render".to_string())
            }
            DrillServiceError::EmptyArtifact => {
                AppError::EmptyArtifact("No sentence produced audio".to_string())
            }
            DrillServiceError::Encoding(msg) => AppError::Internal(msg),
            DrillServiceError::Storage(msg) => AppError::StorageUnavailable(msg),
            DrillServiceError::NotFound(key) => AppError::NotFound(key),
            DrillServiceError::Conflict(key) => AppError::Conflict(key),
            DrillServiceError::AccessUnavailable(e) => AppError::AccessUnavailable(e.to_string()),
            DrillServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
