use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Progress events emitted while a generation run advances. One
/// `Synthesizing` event per chunk, then one event per remaining step,
/// closed by `Completed` or `Failed`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum GenerationEvent {
    Chunked {
        total_chunks: usize,
    },
    Synthesizing {
        current: usize,
        total: usize,
    },
    Assembling,
    Uploading,
    ResolvingUrl,
    Completed {
        audio_url: String,
    },
    Failed {
        message: String,
    },
}

/// Lossy fan-out of generation progress. Subscribers come and go; sending
/// with no receivers is normal and only logged at debug level.
pub struct ProgressPublisher {
    channel: broadcast::Sender<GenerationEvent>,
}

impl ProgressPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { channel: tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GenerationEvent> {
        self.channel.subscribe()
    }

    pub fn publish(&self, event: GenerationEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::debug!(
                error = %e,
                "Failed to publish generation event (no receivers)"
            );
        }
    }
}

impl Default for ProgressPublisher {
    fn default() -> Self {
        Self::new()
    }
}
