use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        generation::{GenerationService, GenerationServiceApi, GenerationStatusResponse},
        podcast::{PodcastService, PodcastServiceApi},
    },
    error::AppResult,
    infrastructure::repositories::StoredFile,
};

/// Request for POST /api/podcasts/:podcastId/generate
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub voice: String,
    pub prompt: String,
}

/// Response for the generate and manual-upload endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub audio_url: String,
    pub storage_id: String,
    /// The prompt as stored: truncated to the preview cap
    pub prompt: String,
}

pub struct GenerationController {
    generation_service: Arc<GenerationService>,
    podcast_service: Arc<PodcastService>,
}

impl GenerationController {
    pub fn new(
        generation_service: Arc<GenerationService>,
        podcast_service: Arc<PodcastService>,
    ) -> Self {
        Self {
            generation_service,
            podcast_service,
        }
    }

    /// POST /api/podcasts/:podcastId/generate - Run the text-to-podcast
    /// pipeline and attach the result to the podcast
    pub async fn generate(
        State(controller): State<Arc<GenerationController>>,
        Path(podcast_id): Path<Uuid>,
        Json(request): Json<GenerateRequest>,
    ) -> AppResult<Json<GenerateResponse>> {
        // The podcast must exist before any synthesis is paid for
        controller.podcast_service.get_podcast(podcast_id).await?;

        let outcome = controller
            .generation_service
            .generate(&request.prompt, &request.voice)
            .await?;

        controller
            .podcast_service
            .attach_audio(
                podcast_id,
                &outcome.storage_id,
                &outcome.audio_url,
                &outcome.prompt_preview,
            )
            .await?;

        Ok(Json(GenerateResponse {
            audio_url: outcome.audio_url,
            storage_id: outcome.storage_id,
            prompt: outcome.prompt_preview,
        }))
    }

    /// POST /api/podcasts/:podcastId/audio - Manual mode: store a
    /// caller-supplied audio file as-is (raw request body)
    pub async fn upload_audio(
        State(controller): State<Arc<GenerationController>>,
        Path(podcast_id): Path<Uuid>,
        headers: HeaderMap,
        body: Bytes,
    ) -> AppResult<Json<GenerateResponse>> {
        let podcast = controller.podcast_service.get_podcast(podcast_id).await?;

        let file_name = headers
            .get("X-File-Name")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| format!("audio-{}.mp3", Uuid::new_v4()));
        let mime_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();

        let file = StoredFile {
            name: file_name,
            mime_type,
            bytes: body.to_vec(),
        };

        // The prompt kept on the record doubles as the transcription text
        let prompt = podcast.prompt.unwrap_or_default();

        let outcome = controller
            .generation_service
            .upload_audio(file, &prompt)
            .await?;

        controller
            .podcast_service
            .attach_audio(
                podcast_id,
                &outcome.storage_id,
                &outcome.audio_url,
                &outcome.prompt_preview,
            )
            .await?;

        Ok(Json(GenerateResponse {
            audio_url: outcome.audio_url,
            storage_id: outcome.storage_id,
            prompt: outcome.prompt_preview,
        }))
    }

    /// GET /api/generation/status - Progress of the current run, if any
    pub async fn get_status(
        State(controller): State<Arc<GenerationController>>,
    ) -> Json<GenerationStatusResponse> {
        Json(controller.generation_service.status())
    }
}
