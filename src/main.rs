use eastcast_backend::infrastructure::config::{Config, LogFormat, TtsProvider};
use eastcast_backend::infrastructure::db::{check_connection, create_pool};
use eastcast_backend::infrastructure::http::start_http_server;
use eastcast_backend::infrastructure::repositories::{
    HttpStorageConfig, HttpStorageRepository, OpenAiTtsRepository, PollyTtsRepository,
    TtsRepository,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Eastcast Backend on {}:{}",
        config.host,
        config.port
    );
    if config.is_development() {
        tracing::info!("Running in development mode");
    }

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    // Verify database connection
    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    // Create the configured TTS client
    let tts_repo: Arc<dyn TtsRepository> = match config.tts_provider {
        TtsProvider::OpenAi => {
            tracing::info!(
                model = %config.openai_tts_model,
                "Initializing OpenAI TTS client"
            );
            let openai_config =
                async_openai::config::OpenAIConfig::new().with_api_key(config.openai_api_key.clone());
            let openai_client = Arc::new(async_openai::Client::with_config(openai_config));
            Arc::new(OpenAiTtsRepository::new(
                openai_client,
                config.openai_tts_model.clone(),
            ))
        }
        TtsProvider::Polly => {
            tracing::info!(region = %config.aws_region, "Initializing AWS Polly client");
            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
            Arc::new(PollyTtsRepository::new(polly_client))
        }
    };
    tracing::info!("TTS client initialized successfully");

    // Create the storage service client
    let storage_repo = Arc::new(HttpStorageRepository::new(HttpStorageConfig {
        base_url: config.storage_base_url.clone(),
        timeout_secs: config.storage_timeout_secs,
    })?);
    tracing::info!(base_url = %config.storage_base_url, "Storage client initialized");

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories (inject db pool)
    tracing::info!("Instantiating repositories...");
    let podcast_repo = Arc::new(
        eastcast_backend::infrastructure::repositories::PodcastRepository::new(pool.clone()),
    );

    // 2. Instantiate services (inject repositories and clients)
    tracing::info!("Instantiating services...");
    let podcast_service = Arc::new(eastcast_backend::domain::podcast::PodcastService::new(
        podcast_repo.clone(),
    ));
    let generation_service = Arc::new(eastcast_backend::domain::generation::GenerationService::new(
        tts_repo,
        storage_repo,
    ));

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let podcast_controller = Arc::new(
        eastcast_backend::controllers::podcast::PodcastController::new(podcast_service.clone()),
    );
    let generation_controller = Arc::new(
        eastcast_backend::controllers::generation::GenerationController::new(
            generation_service,
            podcast_service,
        ),
    );

    // Start HTTP server with all routes
    start_http_server(pool, config, podcast_controller, generation_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "eastcast_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "eastcast_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
