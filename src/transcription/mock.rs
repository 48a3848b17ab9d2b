//! Scripted transcriber for tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{MediaKind, Transcriber, TranscriptionError};

#[derive(Debug, Clone)]
pub struct MockTranscriber {
    outcome: Result<Option<String>, TranscriptionError>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockTranscriber {
    pub fn returning(text: impl Into<String>) -> Self {
        Self::with_outcome(Ok(Some(text.into())))
    }

    /// Transcription succeeds but hears nothing.
    pub fn silent() -> Self {
        Self::with_outcome(Ok(None))
    }

    pub fn failing(error: TranscriptionError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<Option<String>, TranscriptionError>) -> Self {
        Self {
            outcome,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(
        &self,
        _media: &[u8],
        _kind: MediaKind,
    ) -> Result<Option<String>, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.outcome.clone()
    }
}
