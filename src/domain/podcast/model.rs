use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Podcast {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub prompt: Option<String>,
    pub audio_url: Option<String>,
    pub audio_storage_id: Option<String>,
    pub audio_duration_seconds: Option<f64>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}
