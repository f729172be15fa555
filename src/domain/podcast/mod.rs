pub mod error;
pub mod model;
pub mod service;

pub use error::PodcastServiceError;
pub use model::Podcast;
pub use service::{PodcastService, PodcastServiceApi};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response for podcast endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct PodcastResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_storage_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_duration_seconds: Option<f64>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

/// Request to create a new podcast
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePodcastRequest {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl From<Podcast> for PodcastResponse {
    fn from(podcast: Podcast) -> Self {
        Self {
            id: podcast.id,
            title: podcast.title,
            description: podcast.description,
            prompt: podcast.prompt,
            audio_url: podcast.audio_url,
            audio_storage_id: podcast.audio_storage_id,
            audio_duration_seconds: podcast.audio_duration_seconds,
            views: podcast.views,
            created_at: podcast.created_at,
        }
    }
}
