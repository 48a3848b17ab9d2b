//! Speech transcription seam.
//!
//! The engine itself (speech recognition, translation to a canonical language) is an
//! external collaborator; this module defines the boundary and media-kind detection.

mod error;
mod media;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod stub;

#[cfg(test)]
mod tests;

pub use error::TranscriptionError;
pub use media::{AUDIO_EXTENSIONS, MediaKind, VIDEO_EXTENSIONS};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockTranscriber;
pub use stub::StubTranscriber;

/// Maps raw audio/video bytes to text.
///
/// `Ok(None)` means the media was decoded but contained no usable speech, which callers
/// report as "could not process" rather than as a failure. Implementations block.
pub trait Transcriber: Send + Sync + std::fmt::Debug {
    fn transcribe(
        &self,
        media: &[u8],
        kind: MediaKind,
    ) -> Result<Option<String>, TranscriptionError>;

    fn is_stub(&self) -> bool {
        false
    }
}
