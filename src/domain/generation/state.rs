use serde::{Deserialize, Serialize};

/// Where a generation run currently is. Replaces the pile of independent
/// booleans the UI used to juggle with one explicit machine.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationPhase {
    Idle,
    Chunking,
    Synthesizing { current: usize, total: usize },
    Assembling,
    Uploading,
    ResolvingUrl,
    Done,
    Failed,
}

impl GenerationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationPhase::Idle => "idle",
            GenerationPhase::Chunking => "chunking",
            GenerationPhase::Synthesizing { .. } => "synthesizing",
            GenerationPhase::Assembling => "assembling",
            GenerationPhase::Uploading => "uploading",
            GenerationPhase::ResolvingUrl => "resolving_url",
            GenerationPhase::Done => "done",
            GenerationPhase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for GenerationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transient per-run state. Owned by exactly one in-flight orchestration
/// call; reset at the start of every run.
#[derive(Debug, Clone)]
pub struct GenerationState {
    pub phase: GenerationPhase,
    pub audio_url: Option<String>,
}

impl GenerationState {
    pub fn new() -> Self {
        Self {
            phase: GenerationPhase::Idle,
            audio_url: None,
        }
    }

    /// Reset for a fresh run: clears the previous URL, enters Chunking
    pub fn begin(&mut self) {
        self.phase = GenerationPhase::Chunking;
        self.audio_url = None;
    }

    pub fn is_generating(&self) -> bool {
        matches!(
            self.phase,
            GenerationPhase::Chunking
                | GenerationPhase::Synthesizing { .. }
                | GenerationPhase::Uploading
                | GenerationPhase::Assembling
                | GenerationPhase::ResolvingUrl
        )
    }

    /// Human-readable progress, `"<i>/<total>..."` while synthesizing and
    /// empty in every other phase
    pub fn progress_text(&self) -> String {
        match self.phase {
            GenerationPhase::Synthesizing { current, total } => format!("{current}/{total}..."),
            _ => String::new(),
        }
    }
}

impl Default for GenerationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Response for GET /api/generation/status
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationStatusResponse {
    pub is_generating: bool,
    pub progress_text: String,
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl From<&GenerationState> for GenerationStatusResponse {
    fn from(state: &GenerationState) -> Self {
        Self {
            is_generating: state.is_generating(),
            progress_text: state.progress_text(),
            phase: state.phase.to_string(),
            audio_url: state.audio_url.clone(),
        }
    }
}
