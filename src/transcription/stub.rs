use tracing::debug;

use super::{MediaKind, Transcriber, TranscriptionError};

/// Treats a UTF-8 payload as its own transcript.
///
/// Lets the file-query path run end to end without a speech engine: uploading a text
/// body with an audio extension "transcribes" to that text, anything non-UTF-8 or blank
/// hears nothing.
#[derive(Debug, Clone, Default)]
pub struct StubTranscriber;

impl StubTranscriber {
    pub fn new() -> Self {
        Self
    }
}

impl Transcriber for StubTranscriber {
    fn transcribe(
        &self,
        media: &[u8],
        kind: MediaKind,
    ) -> Result<Option<String>, TranscriptionError> {
        debug!(media_len = media.len(), %kind, "Stub transcription");

        let transcript = std::str::from_utf8(media)
            .ok()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        Ok(transcript)
    }

    fn is_stub(&self) -> bool {
        true
    }
}
