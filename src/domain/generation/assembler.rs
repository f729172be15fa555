use uuid::Uuid;

/// Media type of every assembled asset
pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

/// A single playable audio asset built from ordered synthesis segments
#[derive(Debug, Clone)]
pub struct AssembledAudio {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Assembling zero segments is a caller bug, not a runtime condition
#[derive(Debug, thiserror::Error)]
#[error("cannot assemble an audio asset from zero segments")]
pub struct AssembleError;

/// Concatenate audio segments strictly in input order into one MP3 asset
/// with a unique `podcast-<uuid>.mp3` name.
pub fn assemble(segments: &[Vec<u8>]) -> Result<AssembledAudio, AssembleError> {
    if segments.is_empty() {
        return Err(AssembleError);
    }

    let mut merged = Vec::with_capacity(segments.iter().map(Vec::len).sum());
    for segment in segments {
        merged.extend_from_slice(segment);
    }

    let file_name = format!("podcast-{}.mp3", Uuid::new_v4());

    tracing::debug!(
        segment_count = segments.len(),
        audio_size_bytes = merged.len(),
        file_name = %file_name,
        "Audio segments assembled"
    );

    Ok(AssembledAudio {
        file_name,
        mime_type: AUDIO_MIME_TYPE.to_string(),
        bytes: merged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_segments_are_concatenated_in_order() {
        let segments = vec![b"one".to_vec(), b"two".to_vec(), b"three".to_vec()];
        let assembled = assemble(&segments).unwrap();
        assert_eq!(assembled.bytes, b"onetwothree".to_vec());
    }

    #[test]
    fn test_single_segment_passes_through() {
        let segments = vec![vec![0u8, 1, 2, 3]];
        let assembled = assemble(&segments).unwrap();
        assert_eq!(assembled.bytes, vec![0u8, 1, 2, 3]);
    }

    #[test]
    fn test_asset_is_tagged_audio_mpeg() {
        let assembled = assemble(&[b"x".to_vec()]).unwrap();
        assert_eq!(assembled.mime_type, "audio/mpeg");
    }

    #[test]
    fn test_file_name_matches_podcast_pattern() {
        let assembled = assemble(&[b"x".to_vec()]).unwrap();
        let pattern = regex::Regex::new(
            r"^podcast-[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}\.mp3$",
        )
        .unwrap();
        assert!(
            pattern.is_match(&assembled.file_name),
            "unexpected file name: {}",
            assembled.file_name
        );
    }

    #[test]
    fn test_file_names_are_unique_per_run() {
        let a = assemble(&[b"x".to_vec()]).unwrap();
        let b = assemble(&[b"x".to_vec()]).unwrap();
        assert_ne!(a.file_name, b.file_name);
    }

    #[test]
    fn test_zero_segments_is_rejected() {
        assert!(assemble(&[]).is_err());
    }
}
