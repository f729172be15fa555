pub mod assembler;
pub mod chunker;
pub mod error;
pub mod events;
pub mod service;
pub mod state;
pub mod truncate;

pub use assembler::{assemble, AssembledAudio, AUDIO_MIME_TYPE};
pub use chunker::{chunk_at_sentences, DEFAULT_MAX_CHUNK_CHARS};
pub use error::GenerationServiceError;
pub use events::{GenerationEvent, ProgressPublisher};
pub use service::{GenerationOutcome, GenerationService, GenerationServiceApi};
pub use state::{GenerationPhase, GenerationState, GenerationStatusResponse};
pub use truncate::{truncate_words, DEFAULT_MAX_PREVIEW_WORDS};
