//! End-to-end pipeline scenarios driven through the public generation API,
//! with in-memory synthesis and storage collaborators.

use async_trait::async_trait;
use eastcast_backend::domain::generation::{
    GenerationService, GenerationServiceApi, GenerationServiceError,
};
use eastcast_backend::infrastructure::repositories::{
    StorageRepository, StoredFile, TtsRepository,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

/// Synthesis stub that records every call and replays scripted audio
/// buffers in order (cycling when the script runs out)
struct ScriptedTts {
    script: Vec<Vec<u8>>,
    calls: Mutex<Vec<String>>,
    fail_at_call: Option<usize>,
}

impl ScriptedTts {
    fn new(script: Vec<Vec<u8>>) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
            fail_at_call: None,
        }
    }

    fn recorded_chunks(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TtsRepository for ScriptedTts {
    async fn synthesize(&self, _voice: &str, text: &str) -> Result<Vec<u8>, String> {
        let mut calls = self.calls.lock().unwrap();
        let call_number = calls.len() + 1;
        if self.fail_at_call == Some(call_number) {
            return Err("synthesis backend unavailable".to_string());
        }
        calls.push(text.to_string());
        Ok(self.script[(call_number - 1) % self.script.len()].clone())
    }
}

struct MemoryStorage {
    uploads: Mutex<Vec<StoredFile>>,
}

impl MemoryStorage {
    fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
        }
    }

    fn uploaded_files(&self) -> Vec<StoredFile> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageRepository for MemoryStorage {
    async fn upload(&self, file: StoredFile) -> Result<String, String> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(file);
        Ok(format!("mem-{}", uploads.len()))
    }

    async fn resolve_url(&self, storage_id: &str) -> Result<String, String> {
        Ok(format!("https://files.eastcast.example/{storage_id}"))
    }
}

fn pipeline(tts: Arc<ScriptedTts>, storage: Arc<MemoryStorage>) -> GenerationService {
    GenerationService::new(tts, storage)
}

#[tokio::test]
async fn it_should_generate_a_short_prompt_as_one_chunk() {
    let tts = Arc::new(ScriptedTts::new(vec![b"audio".to_vec()]));
    let storage = Arc::new(MemoryStorage::new());
    let service = pipeline(tts.clone(), storage.clone());

    let prompt = "Hello world. This is a test.";
    let outcome = service.generate(prompt, "alloy").await.unwrap();

    // Exactly one chunk, equal to the trimmed input
    assert_eq!(tts.recorded_chunks(), vec![prompt.to_string()]);
    assert_eq!(outcome.audio_url, "https://files.eastcast.example/mem-1");
    assert_eq!(outcome.prompt_preview, prompt);
}

#[tokio::test]
async fn it_should_split_long_prompts_and_reproduce_the_text() {
    let tts = Arc::new(ScriptedTts::new(vec![b"x".to_vec()]));
    let storage = Arc::new(MemoryStorage::new());
    let service = pipeline(tts.clone(), storage.clone());

    // ~9000 characters of short sentences
    let prompt = "A. ".repeat(3000);
    service.generate(&prompt, "alloy").await.unwrap();

    let chunks = tts.recorded_chunks();
    assert!(chunks.len() >= 3, "expected at least 3 chunks");
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 4000);
    }
    // Space-joining the synthesized chunks reproduces the sentence sequence
    assert_eq!(chunks.join(" "), prompt.trim());
}

#[tokio::test]
async fn it_should_reject_an_empty_prompt_before_any_call() {
    let tts = Arc::new(ScriptedTts::new(vec![b"x".to_vec()]));
    let storage = Arc::new(MemoryStorage::new());
    let service = pipeline(tts.clone(), storage.clone());

    let err = service.generate("", "alloy").await.unwrap_err();

    assert!(matches!(err, GenerationServiceError::Invalid(_)));
    assert!(tts.recorded_chunks().is_empty());
    assert!(storage.uploaded_files().is_empty());
}

#[tokio::test]
async fn it_should_upload_the_concatenation_of_all_segments() {
    let (b1, b2, b3) = (b"first-".to_vec(), b"second-".to_vec(), b"third".to_vec());
    let tts = Arc::new(ScriptedTts::new(vec![b1.clone(), b2.clone(), b3.clone()]));
    let storage = Arc::new(MemoryStorage::new());
    let service = pipeline(tts.clone(), storage.clone());

    let prompt = "A. ".repeat(3000);
    service.generate(&prompt, "nova").await.unwrap();
    assert_eq!(tts.recorded_chunks().len(), 3);

    let uploads = storage.uploaded_files();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].bytes, b"first-second-third".to_vec());
    assert_eq!(uploads[0].mime_type, "audio/mpeg");

    let name_pattern = regex::Regex::new(r"^podcast-[0-9a-f-]{36}\.mp3$").unwrap();
    assert!(
        name_pattern.is_match(&uploads[0].name),
        "unexpected asset name: {}",
        uploads[0].name
    );
}

#[tokio::test]
async fn it_should_leave_no_audio_url_after_a_failed_run() {
    let tts = Arc::new(ScriptedTts {
        fail_at_call: Some(2),
        ..ScriptedTts::new(vec![b"x".to_vec()])
    });
    let storage = Arc::new(MemoryStorage::new());
    let service = pipeline(tts, storage.clone());

    let prompt = "A. ".repeat(3000);
    let err = service.generate(&prompt, "alloy").await.unwrap_err();

    assert!(matches!(err, GenerationServiceError::Synthesis(_)));
    assert!(storage.uploaded_files().is_empty());

    let status = service.status();
    assert!(!status.is_generating);
    assert_eq!(status.progress_text, "");
    assert!(status.audio_url.is_none());
}

#[tokio::test]
async fn it_should_store_a_manual_upload_verbatim() {
    let tts = Arc::new(ScriptedTts::new(vec![b"x".to_vec()]));
    let storage = Arc::new(MemoryStorage::new());
    let service = pipeline(tts.clone(), storage.clone());

    let bytes: Vec<u8> = (0u8..=255).collect();
    let file = StoredFile {
        name: "interview.mp3".to_string(),
        mime_type: "audio/mpeg".to_string(),
        bytes: bytes.clone(),
    };
    let outcome = service.upload_audio(file, "A raw interview.").await.unwrap();

    // No synthesis in manual mode; the bytes pass through untouched
    assert!(tts.recorded_chunks().is_empty());
    let uploads = storage.uploaded_files();
    assert_eq!(uploads[0].bytes, bytes);
    assert_eq!(uploads[0].name, "interview.mp3");
    assert_eq!(outcome.audio_url, "https://files.eastcast.example/mem-1");
    assert_eq!(outcome.prompt_preview, "A raw interview.");
}
