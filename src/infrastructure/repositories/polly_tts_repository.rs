use super::tts_repository::TtsRepository;
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

const DEFAULT_VOICE: &str = "Joanna";

/// AWS Polly implementation of the synthesis repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(&self, voice: &str, text: &str) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();

        let voice_name = if voice.is_empty() { DEFAULT_VOICE } else { voice };
        let voice_id = VoiceId::from(voice_name);
        let engine = Engine::Neural;

        tracing::info!(
            voice = voice_name,
            voice_id = ?voice_id,
            engine = ?engine,
            output_format = "Mp3",
            text_length = text.len(),
            text_preview = &text[..text.len().min(200)],
            "Calling AWS Polly synthesize_speech"
        );

        // Clone voice_id for error logging since it will be moved
        let voice_id_for_error = voice_id.clone();

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .output_format(OutputFormat::Mp3)
            .engine(engine.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    error_display = %e,
                    voice_id = ?voice_id_for_error,
                    engine = ?engine,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                format!("AWS Polly error: {:?}", e)
            })?;

        // Get audio stream
        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            format!("Failed to read audio stream: {}", e)
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();

        tracing::info!(
            provider = "polly",
            voice = voice_name,
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio_bytes.len(),
            "Chunk synthesis completed"
        );

        Ok(audio_bytes)
    }
}
