use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum PodcastServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("podcast not found")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for PodcastServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => PodcastServiceError::Invalid(msg),
            AppError::NotFound(_) => PodcastServiceError::NotFound,
            _ => PodcastServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<PodcastServiceError> for AppError {
    fn from(err: PodcastServiceError) -> Self {
        match err {
            PodcastServiceError::Invalid(msg) => AppError::BadRequest(msg),
            PodcastServiceError::NotFound => AppError::NotFound("Podcast not found".to_string()),
            PodcastServiceError::Dependency(msg) => AppError::Internal(msg),
            PodcastServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
