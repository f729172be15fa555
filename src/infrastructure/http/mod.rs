pub mod request_id;

pub use request_id::{request_id_middleware, RequestId};

use axum::{middleware, routing::get, routing::patch, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::controllers::{
    generation::GenerationController, health, podcast::PodcastController,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    pool: Arc<DbPool>,
    config: Arc<Config>,
    podcast_controller: Arc<PodcastController>,
    generation_controller: Arc<GenerationController>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Podcast routes
    let podcast_routes = Router::new()
        .route(
            "/api/podcasts",
            get(PodcastController::list_podcasts).post(PodcastController::create_podcast),
        )
        .route("/api/podcasts/:podcastId", get(PodcastController::get_podcast))
        .route(
            "/api/podcasts/:podcastId/views",
            post(PodcastController::record_view),
        )
        .route(
            "/api/podcasts/:podcastId/audio-duration",
            patch(PodcastController::update_audio_duration),
        )
        .with_state(podcast_controller.clone());

    // Generation routes
    let generation_routes = Router::new()
        .route(
            "/api/podcasts/:podcastId/generate",
            post(GenerationController::generate),
        )
        .route(
            "/api/podcasts/:podcastId/audio",
            post(GenerationController::upload_audio),
        )
        .route(
            "/api/generation/status",
            get(GenerationController::get_status),
        )
        .with_state(generation_controller.clone());

    // Build application routes
    let app = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(pool.clone())
        .merge(podcast_routes)
        .merge(generation_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
