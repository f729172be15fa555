use crate::infrastructure::db::DbPool;
use crate::{
    domain::podcast::{CreatePodcastRequest, Podcast},
    error::{AppError, AppResult},
};
use std::sync::Arc;
use uuid::Uuid;

pub struct PodcastRepository {
    pool: Arc<DbPool>,
}

impl PodcastRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Get all podcasts, newest first
    pub async fn find_all(&self) -> AppResult<Vec<Podcast>> {
        let pool = self.pool.as_ref();
        let podcasts = sqlx::query_as::<_, Podcast>(
            r#"
            SELECT id, title, description, prompt, audio_url, audio_storage_id,
                   audio_duration_seconds, views, created_at
            FROM podcasts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(podcasts)
    }

    /// Get a podcast by ID
    pub async fn find_by_id(&self, podcast_id: Uuid) -> AppResult<Option<Podcast>> {
        let pool = self.pool.as_ref();
        let podcast = sqlx::query_as::<_, Podcast>(
            r#"
            SELECT id, title, description, prompt, audio_url, audio_storage_id,
                   audio_duration_seconds, views, created_at
            FROM podcasts
            WHERE id = $1
            "#,
        )
        .bind(podcast_id)
        .fetch_optional(pool)
        .await?;

        Ok(podcast)
    }

    /// Create a new podcast with client-provided ID
    pub async fn create(&self, request: CreatePodcastRequest) -> AppResult<()> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO podcasts (id, title, description, prompt, views, created_at)
            VALUES ($1, $2, $3, $4, 0, $5)
            "#,
        )
        .bind(request.id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.prompt)
        .bind(now)
        .execute(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("Podcast already exists".to_string());
                }
            }
            AppError::Database(e)
        })?;

        Ok(())
    }

    /// Bump the view counter; false when the podcast does not exist
    pub async fn increment_views(&self, podcast_id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE podcasts
            SET views = views + 1
            WHERE id = $1
            "#,
        )
        .bind(podcast_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Store the outcome of a generation run: storage reference, public URL
    /// and the truncated prompt preview
    pub async fn attach_audio(
        &self,
        podcast_id: Uuid,
        storage_id: &str,
        audio_url: &str,
        prompt_preview: &str,
    ) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE podcasts
            SET audio_storage_id = $1, audio_url = $2, prompt = $3
            WHERE id = $4
            "#,
        )
        .bind(storage_id)
        .bind(audio_url)
        .bind(prompt_preview)
        .bind(podcast_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Store the client-reported playback duration
    pub async fn update_duration(
        &self,
        podcast_id: Uuid,
        duration_seconds: f64,
    ) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE podcasts
            SET audio_duration_seconds = $1
            WHERE id = $2
            "#,
        )
        .bind(duration_seconds)
        .bind(podcast_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
