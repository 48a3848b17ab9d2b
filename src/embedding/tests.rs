use super::*;

#[test]
fn test_embedding_rejects_empty() {
    assert_eq!(Embedding::new(vec![]), Err(EmbeddingError::Empty));
}

#[test]
fn test_embedding_rejects_non_finite() {
    assert_eq!(
        Embedding::new(vec![0.1, f32::NAN, 0.3]),
        Err(EmbeddingError::NonFinite { index: 1 })
    );
    assert!(Embedding::new(vec![f32::INFINITY]).is_err());
}

#[test]
fn test_embedding_from_json() {
    let embedding = Embedding::from_json("[0.5, -0.25, 1]").expect("valid payload");
    assert_eq!(embedding.as_slice(), &[0.5, -0.25, 1.0]);
    assert_eq!(embedding.dim(), 3);
}

#[test]
fn test_embedding_from_json_malformed() {
    assert!(matches!(
        Embedding::from_json("not json"),
        Err(EmbeddingError::Malformed { .. })
    ));
    assert!(matches!(
        Embedding::from_json(r#"{"values": [1, 2]}"#),
        Err(EmbeddingError::Malformed { .. })
    ));
    assert!(matches!(
        Embedding::from_json(r#"[1, "two"]"#),
        Err(EmbeddingError::Malformed { .. })
    ));
    assert_eq!(Embedding::from_json("[]"), Err(EmbeddingError::Empty));
}

#[test]
fn test_embedding_from_json_out_of_f32_range() {
    assert!(matches!(
        Embedding::from_json("[1e300]"),
        Err(EmbeddingError::NonFinite { index: 0 })
    ));
}

#[test]
fn test_embedding_serde_validates() {
    let parsed: Result<Embedding, _> = serde_json::from_str("[]");
    assert!(parsed.is_err());

    let embedding = Embedding::new(vec![1.0, 2.0]).unwrap();
    assert_eq!(serde_json::to_string(&embedding).unwrap(), "[1.0,2.0]");
}

#[test]
fn test_modality_parse_and_display() {
    assert_eq!("Face".parse::<Modality>(), Ok(Modality::Face));
    assert_eq!(" voice ".parse::<Modality>(), Ok(Modality::Voice));
    assert!("iris".parse::<Modality>().is_err());
    assert_eq!(Modality::Voice.to_string(), "voice");
    assert_eq!(serde_json::to_string(&Modality::Face).unwrap(), "\"face\"");
}

#[test]
fn test_stub_provider_is_deterministic() {
    let provider = StubEmbeddingProvider::new(Modality::Face, 64);
    let media = b"jpeg bytes of a single face, long enough";

    let a = provider.embed(media).unwrap();
    let b = provider.embed(media).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.dim(), 64);
    assert!(provider.is_stub());

    let norm: f32 = a.as_slice().iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4);
}

#[test]
fn test_stub_provider_distinguishes_media() {
    let provider = StubEmbeddingProvider::new(Modality::Voice, 32);
    let a = provider.embed(b"first recording sample bytes").unwrap();
    let b = provider.embed(b"second recording sample bytes").unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_stub_provider_short_media() {
    let face = StubEmbeddingProvider::new(Modality::Face, 8);
    assert_eq!(face.embed(b"tiny"), Err(ExtractionError::NoFaceDetected));

    let voice = StubEmbeddingProvider::new(Modality::Voice, 8);
    assert_eq!(voice.embed(b""), Err(ExtractionError::NoSpeechDetected));
}

#[test]
fn test_mock_provider_counts_calls() {
    let embedding = Embedding::new(vec![1.0, 0.0]).unwrap();
    let provider = MockEmbeddingProvider::returning(Modality::Face, embedding.clone());

    assert_eq!(provider.embed(b"x").unwrap(), embedding);
    assert_eq!(provider.embed(b"y").unwrap(), embedding);
    assert_eq!(provider.calls(), 2);
    assert_eq!(provider.embedding_dim(), 2);
}

#[test]
fn test_extraction_error_messages() {
    let err = ExtractionError::MultipleFacesDetected { count: 3 };
    assert!(err.to_string().contains("multiple faces"));
    assert!(err.to_string().contains('3'));
}
