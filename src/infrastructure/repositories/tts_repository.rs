use async_trait::async_trait;

/// Repository for speech synthesis.
/// Abstracts the underlying TTS provider (OpenAI, AWS Polly, ...)
///
/// One call synthesizes exactly one text chunk. Splitting long text and
/// merging the per-chunk audio is the orchestrator's job; implementations
/// only need to accept chunks up to the configured character bound.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize one text chunk with the requested voice
    ///
    /// Returns MP3 audio data for the chunk
    ///
    /// # Arguments
    /// * `voice` - Provider voice identifier; unknown names fall back to
    ///   the provider default
    /// * `text` - The chunk to synthesize
    ///
    /// # Errors
    /// Returns error if synthesis fails or the provider is unavailable
    async fn synthesize(&self, voice: &str, text: &str) -> Result<Vec<u8>, String>;
}
