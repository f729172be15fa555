use super::tts_repository::TtsRepository;
use async_openai::{
    config::OpenAIConfig,
    types::{CreateSpeechRequest, SpeechModel, Voice},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI TTS implementation of the synthesis repository
pub struct OpenAiTtsRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiTtsRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }

    /// Parse a requested voice name into the OpenAI voice enum
    fn parse_voice(voice: &str) -> Voice {
        match voice.to_lowercase().as_str() {
            "alloy" => Voice::Alloy,
            "echo" => Voice::Echo,
            "fable" => Voice::Fable,
            "onyx" => Voice::Onyx,
            "nova" => Voice::Nova,
            "shimmer" => Voice::Shimmer,
            _ => Voice::Alloy, // Default fallback
        }
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    async fn synthesize(&self, voice: &str, text: &str) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();

        tracing::info!(
            model = %self.model,
            voice = voice,
            text_length = text.len(),
            text_preview = &text[..text.len().min(200)],
            "Calling OpenAI TTS API"
        );

        // Parse model string to SpeechModel enum
        let model = match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        };

        let request = CreateSpeechRequest {
            model,
            input: text.to_string(),
            voice: Self::parse_voice(voice),
            response_format: None, // Defaults to MP3
            speed: None,           // Defaults to 1.0
        };

        let response = self.client.audio().speech(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.model,
                voice = voice,
                text_length = text.len(),
                "OpenAI TTS API call failed"
            );
            format!("OpenAI TTS error: {}", e)
        })?;

        let audio_bytes = response.bytes.to_vec();

        tracing::info!(
            provider = "openai",
            voice = voice,
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio_bytes.len(),
            "Chunk synthesis completed"
        );

        Ok(audio_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_voices_are_mapped() {
        assert!(matches!(
            OpenAiTtsRepository::parse_voice("alloy"),
            Voice::Alloy
        ));
        assert!(matches!(
            OpenAiTtsRepository::parse_voice("Echo"),
            Voice::Echo
        ));
        assert!(matches!(
            OpenAiTtsRepository::parse_voice("SHIMMER"),
            Voice::Shimmer
        ));
    }

    #[test]
    fn test_unknown_voice_falls_back_to_default() {
        assert!(matches!(
            OpenAiTtsRepository::parse_voice("joanna"),
            Voice::Alloy
        ));
        assert!(matches!(OpenAiTtsRepository::parse_voice(""), Voice::Alloy));
    }
}
