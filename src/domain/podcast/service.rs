use super::error::PodcastServiceError;
use super::{CreatePodcastRequest, Podcast};
use crate::infrastructure::repositories::PodcastRepository;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub struct PodcastService {
    podcast_repo: Arc<PodcastRepository>,
}

impl PodcastService {
    pub fn new(podcast_repo: Arc<PodcastRepository>) -> Self {
        Self { podcast_repo }
    }
}

#[async_trait]
pub trait PodcastServiceApi: Send + Sync {
    async fn list_podcasts(&self) -> Result<Vec<Podcast>, PodcastServiceError>;

    async fn get_podcast(&self, podcast_id: Uuid) -> Result<Podcast, PodcastServiceError>;

    async fn create_podcast(
        &self,
        request: CreatePodcastRequest,
    ) -> Result<(), PodcastServiceError>;

    /// Bump the view counter when a client navigates to the detail view,
    /// returning the refreshed record
    async fn record_view(&self, podcast_id: Uuid) -> Result<Podcast, PodcastServiceError>;

    /// Attach the outcome of a generation or manual-upload run. The values
    /// are write targets populated by the orchestrator, stored as given.
    async fn attach_audio(
        &self,
        podcast_id: Uuid,
        storage_id: &str,
        audio_url: &str,
        prompt_preview: &str,
    ) -> Result<(), PodcastServiceError>;

    /// Client-reported playback duration, stored unvalidated
    async fn update_duration(
        &self,
        podcast_id: Uuid,
        duration_seconds: f64,
    ) -> Result<(), PodcastServiceError>;
}

#[async_trait]
impl PodcastServiceApi for PodcastService {
    async fn list_podcasts(&self) -> Result<Vec<Podcast>, PodcastServiceError> {
        self.podcast_repo
            .find_all()
            .await
            .map_err(|e| PodcastServiceError::Dependency(e.to_string()))
    }

    async fn get_podcast(&self, podcast_id: Uuid) -> Result<Podcast, PodcastServiceError> {
        self.podcast_repo
            .find_by_id(podcast_id)
            .await
            .map_err(|e| PodcastServiceError::Dependency(e.to_string()))?
            .ok_or(PodcastServiceError::NotFound)
    }

    async fn create_podcast(
        &self,
        request: CreatePodcastRequest,
    ) -> Result<(), PodcastServiceError> {
        if request.title.trim().is_empty() {
            return Err(PodcastServiceError::Invalid(
                "Title cannot be empty".to_string(),
            ));
        }

        self.podcast_repo
            .create(request)
            .await
            .map_err(|e| PodcastServiceError::Dependency(e.to_string()))?;

        Ok(())
    }

    async fn record_view(&self, podcast_id: Uuid) -> Result<Podcast, PodcastServiceError> {
        let updated = self
            .podcast_repo
            .increment_views(podcast_id)
            .await
            .map_err(|e| PodcastServiceError::Dependency(e.to_string()))?;

        if !updated {
            return Err(PodcastServiceError::NotFound);
        }

        self.get_podcast(podcast_id).await
    }

    async fn attach_audio(
        &self,
        podcast_id: Uuid,
        storage_id: &str,
        audio_url: &str,
        prompt_preview: &str,
    ) -> Result<(), PodcastServiceError> {
        let updated = self
            .podcast_repo
            .attach_audio(podcast_id, storage_id, audio_url, prompt_preview)
            .await
            .map_err(|e| PodcastServiceError::Dependency(e.to_string()))?;

        if !updated {
            return Err(PodcastServiceError::NotFound);
        }

        tracing::info!(
            podcast_id = %podcast_id,
            storage_id = storage_id,
            "Audio metadata attached to podcast"
        );

        Ok(())
    }

    async fn update_duration(
        &self,
        podcast_id: Uuid,
        duration_seconds: f64,
    ) -> Result<(), PodcastServiceError> {
        let updated = self
            .podcast_repo
            .update_duration(podcast_id, duration_seconds)
            .await
            .map_err(|e| PodcastServiceError::Dependency(e.to_string()))?;

        if !updated {
            return Err(PodcastServiceError::NotFound);
        }

        Ok(())
    }
}
