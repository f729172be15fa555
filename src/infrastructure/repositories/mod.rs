pub mod http_storage_repository;
pub mod openai_tts_repository;
pub mod podcast_repository;
pub mod polly_tts_repository;
pub mod storage_repository;
pub mod tts_repository;

pub use http_storage_repository::{HttpStorageConfig, HttpStorageRepository};
pub use openai_tts_repository::OpenAiTtsRepository;
pub use podcast_repository::PodcastRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use storage_repository::{StorageRepository, StoredFile};
pub use tts_repository::TtsRepository;
