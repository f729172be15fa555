use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum GenerationServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("a generation run is already in progress")]
    AlreadyRunning,
    #[error("synthesis failed: {0}")]
    Synthesis(String),
    #[error("assembly contract violated: {0}")]
    Assembly(String),
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("url resolution failed: {0}")]
    Resolution(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<GenerationServiceError> for AppError {
    fn from(err: GenerationServiceError) -> Self {
        match err {
            GenerationServiceError::Invalid(msg) => AppError::BadRequest(msg),
            GenerationServiceError::AlreadyRunning => {
                AppError::Conflict("A generation run is already in progress".to_string())
            }
            // Step detail stays in the service logs; the client gets one
            // generic notice for any pipeline failure.
            GenerationServiceError::Synthesis(_)
            | GenerationServiceError::Upload(_)
            | GenerationServiceError::Resolution(_) => {
                AppError::ExternalService("Error creating a podcast".to_string())
            }
            GenerationServiceError::Assembly(msg) => AppError::Internal(msg),
            GenerationServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
