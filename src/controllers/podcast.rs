use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::podcast::{CreatePodcastRequest, PodcastResponse, PodcastService, PodcastServiceApi},
    error::AppResult,
};

/// Request for PATCH /api/podcasts/:podcastId/audio-duration
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateDurationRequest {
    pub seconds: f64,
}

pub struct PodcastController {
    podcast_service: Arc<PodcastService>,
}

impl PodcastController {
    pub fn new(podcast_service: Arc<PodcastService>) -> Self {
        Self { podcast_service }
    }

    /// GET /api/podcasts - List all podcasts, newest first
    pub async fn list_podcasts(
        State(controller): State<Arc<PodcastController>>,
    ) -> AppResult<Json<Vec<PodcastResponse>>> {
        let podcasts = controller.podcast_service.list_podcasts().await?;
        Ok(Json(podcasts.into_iter().map(PodcastResponse::from).collect()))
    }

    /// POST /api/podcasts - Create new podcast
    pub async fn create_podcast(
        State(controller): State<Arc<PodcastController>>,
        Json(request): Json<CreatePodcastRequest>,
    ) -> AppResult<StatusCode> {
        controller.podcast_service.create_podcast(request).await?;
        Ok(StatusCode::CREATED)
    }

    /// GET /api/podcasts/:podcastId - Fetch one podcast
    pub async fn get_podcast(
        State(controller): State<Arc<PodcastController>>,
        Path(podcast_id): Path<Uuid>,
    ) -> AppResult<Json<PodcastResponse>> {
        let podcast = controller.podcast_service.get_podcast(podcast_id).await?;
        Ok(Json(PodcastResponse::from(podcast)))
    }

    /// POST /api/podcasts/:podcastId/views - Count a detail-view navigation
    pub async fn record_view(
        State(controller): State<Arc<PodcastController>>,
        Path(podcast_id): Path<Uuid>,
    ) -> AppResult<Json<PodcastResponse>> {
        let podcast = controller.podcast_service.record_view(podcast_id).await?;
        Ok(Json(PodcastResponse::from(podcast)))
    }

    /// PATCH /api/podcasts/:podcastId/audio-duration - Store the playback
    /// duration reported by the client's audio element
    pub async fn update_audio_duration(
        State(controller): State<Arc<PodcastController>>,
        Path(podcast_id): Path<Uuid>,
        Json(request): Json<UpdateDurationRequest>,
    ) -> AppResult<StatusCode> {
        controller
            .podcast_service
            .update_duration(podcast_id, request.seconds)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
