use super::*;

#[test]
fn test_media_kind_from_extension() {
    assert_eq!(MediaKind::from_extension("mp4"), Some(MediaKind::Video));
    assert_eq!(MediaKind::from_extension(".MKV"), Some(MediaKind::Video));
    assert_eq!(MediaKind::from_extension("call.flv"), Some(MediaKind::Video));
    assert_eq!(MediaKind::from_extension(".wav"), Some(MediaKind::Audio));
    assert_eq!(MediaKind::from_extension("Mp3"), Some(MediaKind::Audio));
}

#[test]
fn test_media_kind_unknown_extension() {
    assert_eq!(MediaKind::from_extension("pdf"), None);
    assert_eq!(MediaKind::from_extension(""), None);
    assert_eq!(MediaKind::from_extension("."), None);
}

#[test]
fn test_stub_transcriber_returns_utf8_payload() {
    let transcriber = StubTranscriber::new();
    let text = transcriber
        .transcribe(b"  I want to open a savings account  ", MediaKind::Audio)
        .unwrap();
    assert_eq!(text.as_deref(), Some("I want to open a savings account"));
    assert!(transcriber.is_stub());
}

#[test]
fn test_stub_transcriber_hears_nothing() {
    let transcriber = StubTranscriber::new();
    assert_eq!(
        transcriber.transcribe(&[0xff, 0xfe, 0x00], MediaKind::Video),
        Ok(None)
    );
    assert_eq!(transcriber.transcribe(b"   ", MediaKind::Audio), Ok(None));
}

#[test]
fn test_mock_transcriber_outcomes() {
    let mock = MockTranscriber::returning("hello");
    assert_eq!(
        mock.transcribe(b"x", MediaKind::Audio),
        Ok(Some("hello".to_string()))
    );
    assert_eq!(mock.calls(), 1);

    let silent = MockTranscriber::silent();
    assert_eq!(silent.transcribe(b"x", MediaKind::Audio), Ok(None));

    let failing = MockTranscriber::failing(TranscriptionError::EngineFailed {
        reason: "gpu lost".into(),
    });
    assert!(failing.transcribe(b"x", MediaKind::Video).is_err());
}
