use super::assembler::assemble;
use super::chunker::chunk_at_sentences;
use super::error::GenerationServiceError;
use super::events::{GenerationEvent, ProgressPublisher};
use super::state::{GenerationPhase, GenerationState, GenerationStatusResponse};
use super::truncate::{truncate_words, DEFAULT_MAX_PREVIEW_WORDS};
use crate::infrastructure::repositories::{StorageRepository, StoredFile, TtsRepository};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Character bound per synthesis call
const SYNTHESIS_CHUNK_CHARS: usize = 4000;

/// Final result of one generation or manual-upload run
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub audio_url: String,
    pub storage_id: String,
    pub prompt_preview: String,
}

pub struct GenerationService {
    tts_repo: Arc<dyn TtsRepository>,
    storage_repo: Arc<dyn StorageRepository>,
    state: RwLock<GenerationState>,
    progress: ProgressPublisher,
    running: AtomicBool,
}

impl GenerationService {
    pub fn new(tts_repo: Arc<dyn TtsRepository>, storage_repo: Arc<dyn StorageRepository>) -> Self {
        Self {
            tts_repo,
            storage_repo,
            state: RwLock::new(GenerationState::new()),
            progress: ProgressPublisher::new(),
            running: AtomicBool::new(false),
        }
    }

    /// Current run state for the status endpoint
    pub fn status(&self) -> GenerationStatusResponse {
        let state = self.state.read().unwrap();
        GenerationStatusResponse::from(&*state)
    }

    /// Subscribe to progress events for the runs that follow
    pub fn subscribe(&self) -> broadcast::Receiver<GenerationEvent> {
        self.progress.subscribe()
    }
}

#[async_trait]
pub trait GenerationServiceApi: Send + Sync {
    /// Run the full text-to-podcast pipeline for one prompt
    ///
    /// Steps, strictly sequential:
    /// - split the prompt into sentence-bounded chunks of at most 4000 chars
    /// - synthesize each chunk in order with the requested voice
    /// - concatenate the audio segments into one MP3 asset
    /// - upload the asset and resolve its public URL
    /// - produce a 200-word prompt preview for display/storage
    ///
    /// A blank prompt fails before any network call. A second call while a
    /// run is in flight is rejected with `AlreadyRunning`.
    async fn generate(
        &self,
        prompt: &str,
        voice: &str,
    ) -> Result<GenerationOutcome, GenerationServiceError>;

    /// Manual mode: persist a caller-supplied audio file as-is and resolve
    /// its URL. Shares the upload/resolution machinery and the run guard,
    /// but never chunks or synthesizes.
    async fn upload_audio(
        &self,
        file: StoredFile,
        prompt: &str,
    ) -> Result<GenerationOutcome, GenerationServiceError>;
}

#[async_trait]
impl GenerationServiceApi for GenerationService {
    async fn generate(
        &self,
        prompt: &str,
        voice: &str,
    ) -> Result<GenerationOutcome, GenerationServiceError> {
        if prompt.trim().is_empty() {
            return Err(GenerationServiceError::Invalid(
                "Please provide a prompt to generate a podcast".to_string(),
            ));
        }

        let _run = self.acquire_run()?;
        self.begin();

        tracing::info!(
            prompt_length = prompt.len(),
            voice = voice,
            "Podcast generation started"
        );

        match self.run_pipeline(prompt, voice).await {
            Ok(outcome) => {
                self.finish_done(&outcome.audio_url);
                self.progress.publish(GenerationEvent::Completed {
                    audio_url: outcome.audio_url.clone(),
                });
                tracing::info!(
                    storage_id = %outcome.storage_id,
                    audio_url = %outcome.audio_url,
                    "Podcast generated successfully"
                );
                Ok(outcome)
            }
            Err(err) => {
                tracing::error!(error = %err, "Error generating podcast");
                self.finish_failed();
                self.progress.publish(GenerationEvent::Failed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn upload_audio(
        &self,
        file: StoredFile,
        prompt: &str,
    ) -> Result<GenerationOutcome, GenerationServiceError> {
        if file.bytes.is_empty() {
            return Err(GenerationServiceError::Invalid(
                "No audio file provided".to_string(),
            ));
        }

        let _run = self.acquire_run()?;
        self.begin();

        tracing::info!(
            file_name = %file.name,
            mime_type = %file.mime_type,
            size_bytes = file.bytes.len(),
            "Manual audio upload started"
        );

        match self.persist_and_resolve(file).await {
            Ok((storage_id, audio_url)) => {
                let prompt_preview = truncate_words(prompt, DEFAULT_MAX_PREVIEW_WORDS);
                self.finish_done(&audio_url);
                self.progress.publish(GenerationEvent::Completed {
                    audio_url: audio_url.clone(),
                });
                tracing::info!(
                    storage_id = %storage_id,
                    audio_url = %audio_url,
                    "Podcast audio uploaded successfully"
                );
                Ok(GenerationOutcome {
                    audio_url,
                    storage_id,
                    prompt_preview,
                })
            }
            Err(err) => {
                tracing::error!(error = %err, "Error uploading podcast audio");
                self.finish_failed();
                self.progress.publish(GenerationEvent::Failed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }
}

impl GenerationService {
    async fn run_pipeline(
        &self,
        prompt: &str,
        voice: &str,
    ) -> Result<GenerationOutcome, GenerationServiceError> {
        // 1. Split the prompt into synthesis-sized chunks
        let chunks = chunk_at_sentences(prompt, SYNTHESIS_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(GenerationServiceError::Invalid(
                "Prompt contains no synthesizable text".to_string(),
            ));
        }
        tracing::info!(
            chunk_count = chunks.len(),
            prompt_length = prompt.len(),
            "Prompt split into chunks"
        );
        self.progress.publish(GenerationEvent::Chunked {
            total_chunks: chunks.len(),
        });

        // 2. Synthesize each chunk strictly in order. Segment order must
        //    match chunk order, so calls are never parallelized.
        let total = chunks.len();
        let mut segments: Vec<Vec<u8>> = Vec::with_capacity(total);
        for (index, chunk) in chunks.iter().enumerate() {
            let current = index + 1;
            self.set_phase(GenerationPhase::Synthesizing { current, total });
            self.progress
                .publish(GenerationEvent::Synthesizing { current, total });

            tracing::info!(
                chunk_index = index,
                chunk_chars = chunk.chars().count(),
                "Synthesizing chunk"
            );

            let audio = self
                .tts_repo
                .synthesize(voice, chunk)
                .await
                .map_err(GenerationServiceError::Synthesis)?;
            segments.push(audio);
        }

        // 3. Concatenate the ordered segments into one playable asset
        self.set_phase(GenerationPhase::Assembling);
        self.progress.publish(GenerationEvent::Assembling);
        let assembled =
            assemble(&segments).map_err(|e| GenerationServiceError::Assembly(e.to_string()))?;

        // 4.-5. Upload the asset and resolve its public URL
        let file = StoredFile {
            name: assembled.file_name,
            mime_type: assembled.mime_type,
            bytes: assembled.bytes,
        };
        let (storage_id, audio_url) = self.persist_and_resolve(file).await?;

        // 6. The stored prompt becomes a bounded preview
        let prompt_preview = truncate_words(prompt, DEFAULT_MAX_PREVIEW_WORDS);

        Ok(GenerationOutcome {
            audio_url,
            storage_id,
            prompt_preview,
        })
    }

    async fn persist_and_resolve(
        &self,
        file: StoredFile,
    ) -> Result<(String, String), GenerationServiceError> {
        self.set_phase(GenerationPhase::Uploading);
        self.progress.publish(GenerationEvent::Uploading);
        tracing::info!(
            file_name = %file.name,
            size_bytes = file.bytes.len(),
            "Uploading audio asset"
        );
        let storage_id = self
            .storage_repo
            .upload(file)
            .await
            .map_err(GenerationServiceError::Upload)?;

        self.set_phase(GenerationPhase::ResolvingUrl);
        self.progress.publish(GenerationEvent::ResolvingUrl);
        let audio_url = self
            .storage_repo
            .resolve_url(&storage_id)
            .await
            .map_err(GenerationServiceError::Resolution)?;

        Ok((storage_id, audio_url))
    }

    /// Claim the single run slot; released when the returned guard drops
    fn acquire_run(&self) -> Result<RunGuard<'_>, GenerationServiceError> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| GenerationServiceError::AlreadyRunning)?;
        Ok(RunGuard {
            flag: &self.running,
        })
    }

    fn begin(&self) {
        self.state.write().unwrap().begin();
    }

    fn set_phase(&self, phase: GenerationPhase) {
        self.state.write().unwrap().phase = phase;
    }

    fn finish_done(&self, audio_url: &str) {
        let mut state = self.state.write().unwrap();
        state.phase = GenerationPhase::Done;
        state.audio_url = Some(audio_url.to_string());
    }

    fn finish_failed(&self) {
        let mut state = self.state.write().unwrap();
        state.phase = GenerationPhase::Failed;
        state.audio_url = None;
    }
}

struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    struct FakeTts {
        calls: Mutex<Vec<(String, String)>>,
        fail_at_call: Option<usize>,
        gate: Option<Arc<Notify>>,
    }

    impl FakeTts {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_at_call: None,
                gate: None,
            }
        }

        fn failing_at(call: usize) -> Self {
            Self {
                fail_at_call: Some(call),
                ..Self::new()
            }
        }

        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TtsRepository for FakeTts {
        async fn synthesize(&self, voice: &str, text: &str) -> Result<Vec<u8>, String> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let mut calls = self.calls.lock().unwrap();
            let call_number = calls.len() + 1;
            if self.fail_at_call == Some(call_number) {
                return Err("synthesis backend unavailable".to_string());
            }
            calls.push((voice.to_string(), text.to_string()));
            Ok(format!("[part-{call_number}]").into_bytes())
        }
    }

    struct FakeStorage {
        uploads: Mutex<Vec<StoredFile>>,
        fail_upload: bool,
        fail_resolve: bool,
    }

    impl FakeStorage {
        fn new() -> Self {
            Self {
                uploads: Mutex::new(Vec::new()),
                fail_upload: false,
                fail_resolve: false,
            }
        }

        fn upload_count(&self) -> usize {
            self.uploads.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl StorageRepository for FakeStorage {
        async fn upload(&self, file: StoredFile) -> Result<String, String> {
            if self.fail_upload {
                return Err("storage write failed".to_string());
            }
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push(file);
            Ok(format!("stored-{}", uploads.len()))
        }

        async fn resolve_url(&self, storage_id: &str) -> Result<String, String> {
            if self.fail_resolve {
                return Err("unknown storage reference".to_string());
            }
            Ok(format!("https://cdn.eastcast.example/{storage_id}"))
        }
    }

    fn service(tts: Arc<FakeTts>, storage: Arc<FakeStorage>) -> GenerationService {
        GenerationService::new(tts, storage)
    }

    #[tokio::test]
    async fn test_single_chunk_prompt_generates_one_asset() {
        let tts = Arc::new(FakeTts::new());
        let storage = Arc::new(FakeStorage::new());
        let service = service(tts.clone(), storage.clone());

        let prompt = "Hello world. This is a test.";
        let outcome = service.generate(prompt, "alloy").await.unwrap();

        assert_eq!(tts.call_count(), 1);
        let calls = tts.calls.lock().unwrap();
        assert_eq!(calls[0], ("alloy".to_string(), prompt.to_string()));
        drop(calls);

        let uploads = storage.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].bytes, b"[part-1]".to_vec());
        assert_eq!(uploads[0].mime_type, "audio/mpeg");
        assert!(uploads[0].name.starts_with("podcast-"));
        assert!(uploads[0].name.ends_with(".mp3"));
        drop(uploads);

        assert_eq!(outcome.storage_id, "stored-1");
        assert_eq!(outcome.audio_url, "https://cdn.eastcast.example/stored-1");
        assert_eq!(outcome.prompt_preview, prompt);

        let status = service.status();
        assert!(!status.is_generating);
        assert_eq!(status.phase, "done");
        assert_eq!(status.audio_url.as_deref(), Some(outcome.audio_url.as_str()));
    }

    #[tokio::test]
    async fn test_multi_chunk_prompt_concatenates_segments_in_order() {
        let tts = Arc::new(FakeTts::new());
        let storage = Arc::new(FakeStorage::new());
        let service = service(tts.clone(), storage.clone());
        let mut events = service.subscribe();

        // 9000 chars of two-char sentences -> three chunks under the 4000 bound
        let prompt = "A. ".repeat(3000);
        service.generate(&prompt, "onyx").await.unwrap();

        assert_eq!(tts.call_count(), 3);
        for (_, text) in tts.calls.lock().unwrap().iter() {
            assert!(text.chars().count() <= 4000);
        }

        let uploads = storage.uploads.lock().unwrap();
        assert_eq!(uploads[0].bytes, b"[part-1][part-2][part-3]".to_vec());
        drop(uploads);

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(event);
        }
        assert_eq!(seen[0], GenerationEvent::Chunked { total_chunks: 3 });
        assert_eq!(
            &seen[1..4],
            &[
                GenerationEvent::Synthesizing {
                    current: 1,
                    total: 3
                },
                GenerationEvent::Synthesizing {
                    current: 2,
                    total: 3
                },
                GenerationEvent::Synthesizing {
                    current: 3,
                    total: 3
                },
            ]
        );
        assert_eq!(seen[4], GenerationEvent::Assembling);
        assert_eq!(seen[5], GenerationEvent::Uploading);
        assert_eq!(seen[6], GenerationEvent::ResolvingUrl);
        assert!(matches!(seen[7], GenerationEvent::Completed { .. }));
    }

    #[tokio::test]
    async fn test_blank_prompt_fails_before_any_call() {
        let tts = Arc::new(FakeTts::new());
        let storage = Arc::new(FakeStorage::new());
        let service = service(tts.clone(), storage.clone());

        for prompt in ["", "   ", " \n\t "] {
            let err = service.generate(prompt, "alloy").await.unwrap_err();
            assert!(matches!(err, GenerationServiceError::Invalid(_)));
        }

        assert_eq!(tts.call_count(), 0);
        assert_eq!(storage.upload_count(), 0);
        assert_eq!(service.status().phase, "idle");
    }

    #[tokio::test]
    async fn test_synthesis_failure_aborts_run_and_resets_state() {
        let tts = Arc::new(FakeTts::failing_at(2));
        let storage = Arc::new(FakeStorage::new());
        let service = service(tts.clone(), storage.clone());
        let mut events = service.subscribe();

        let prompt = "A. ".repeat(3000);
        let err = service.generate(&prompt, "alloy").await.unwrap_err();

        assert!(matches!(err, GenerationServiceError::Synthesis(_)));
        // Nothing assembled or uploaded after a mid-run failure
        assert_eq!(storage.upload_count(), 0);

        let status = service.status();
        assert!(!status.is_generating);
        assert_eq!(status.progress_text, "");
        assert_eq!(status.phase, "failed");
        assert!(status.audio_url.is_none());

        let mut last = None;
        while let Ok(event) = events.try_recv() {
            last = Some(event);
        }
        assert!(matches!(last, Some(GenerationEvent::Failed { .. })));
    }

    #[tokio::test]
    async fn test_upload_failure_aborts_run() {
        let tts = Arc::new(FakeTts::new());
        let storage = Arc::new(FakeStorage {
            fail_upload: true,
            ..FakeStorage::new()
        });
        let service = service(tts.clone(), storage.clone());

        let err = service.generate("Some prompt.", "alloy").await.unwrap_err();

        assert!(matches!(err, GenerationServiceError::Upload(_)));
        assert_eq!(service.status().phase, "failed");
        assert!(service.status().audio_url.is_none());
    }

    #[tokio::test]
    async fn test_resolution_failure_aborts_run() {
        let tts = Arc::new(FakeTts::new());
        let storage = Arc::new(FakeStorage {
            fail_resolve: true,
            ..FakeStorage::new()
        });
        let service = service(tts.clone(), storage.clone());

        let err = service.generate("Some prompt.", "alloy").await.unwrap_err();

        assert!(matches!(err, GenerationServiceError::Resolution(_)));
        assert_eq!(service.status().phase, "failed");
    }

    #[tokio::test]
    async fn test_concurrent_generate_is_rejected() {
        let gate = Arc::new(Notify::new());
        let tts = Arc::new(FakeTts::gated(gate.clone()));
        let storage = Arc::new(FakeStorage::new());
        let service = Arc::new(service(tts, storage));

        let background = {
            let service = service.clone();
            tokio::spawn(async move { service.generate("First run.", "alloy").await })
        };

        // Wait for the first run to reach the gated synthesis call
        while !service.status().is_generating {
            tokio::task::yield_now().await;
        }

        let err = service.generate("Second run.", "alloy").await.unwrap_err();
        assert!(matches!(err, GenerationServiceError::AlreadyRunning));

        // Let the first run finish; it must be undisturbed
        gate.notify_one();
        let outcome = background.await.unwrap().unwrap();
        assert_eq!(outcome.audio_url, "https://cdn.eastcast.example/stored-1");
        assert_eq!(service.status().phase, "done");
    }

    #[tokio::test]
    async fn test_manual_upload_bypasses_synthesis() {
        let tts = Arc::new(FakeTts::new());
        let storage = Arc::new(FakeStorage::new());
        let service = service(tts.clone(), storage.clone());

        let file = StoredFile {
            name: "episode-raw.mp3".to_string(),
            mime_type: "audio/mpeg".to_string(),
            bytes: vec![7u8; 64],
        };
        let prompt = "word ".repeat(250);
        let outcome = service.upload_audio(file, &prompt).await.unwrap();

        assert_eq!(tts.call_count(), 0);
        let uploads = storage.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].name, "episode-raw.mp3");
        assert_eq!(uploads[0].bytes, vec![7u8; 64]);
        drop(uploads);

        assert_eq!(outcome.audio_url, "https://cdn.eastcast.example/stored-1");
        assert!(outcome.prompt_preview.ends_with("..."));
        assert_eq!(outcome.prompt_preview.split_whitespace().count(), 200);
        assert_eq!(service.status().phase, "done");
    }

    #[tokio::test]
    async fn test_manual_upload_rejects_empty_file() {
        let tts = Arc::new(FakeTts::new());
        let storage = Arc::new(FakeStorage::new());
        let service = service(tts, storage.clone());

        let file = StoredFile {
            name: "empty.mp3".to_string(),
            mime_type: "audio/mpeg".to_string(),
            bytes: Vec::new(),
        };
        let err = service.upload_audio(file, "prompt").await.unwrap_err();

        assert!(matches!(err, GenerationServiceError::Invalid(_)));
        assert_eq!(storage.upload_count(), 0);
    }
}
