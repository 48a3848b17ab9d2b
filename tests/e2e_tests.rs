//! End-to-end HTTP tests against a live server.

mod common;

use std::sync::Arc;

use teller::transcription::MockTranscriber;

use common::harness::{TestServerConfig, spawn_test_server};
use common::http_client::{TestClient, TestClientError};

const FACE_PHOTO: &[u8] = b"\xff\xd8\xff\xe0 customer face photo taken at onboarding";
const VOICE_SAMPLE: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt customer voice sample";

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");

    let client = TestClient::new(server.url());
    let health = client.health().await.expect("Health check should succeed");

    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_ready_reports_components() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");

    let client = TestClient::new(server.url());
    let (status, ready) = client.ready().await.expect("Ready should respond");

    assert_eq!(status, 200);
    assert!(ready.is_ok());
    assert_eq!(ready.components.model, "ready");
    assert_eq!(ready.components.face_extractor, "stub");
    assert_eq!(ready.components.voice_extractor, "stub");
}

#[tokio::test]
async fn test_cold_model_trains_on_first_statistical_query() {
    let server = spawn_test_server(TestServerConfig {
        warm_model: false,
        ..Default::default()
    })
    .await
    .expect("Server should start");

    let client = TestClient::new(server.url());
    let (status, ready) = client.ready().await.expect("Ready should respond");
    assert_eq!(status, 503);
    assert_eq!(ready.components.model, "cold");

    // keyword hits never touch the model
    client.query_text("home loan").await.expect("keyword query");
    assert_eq!(server.registry.training_runs(), 0);

    let (result, routed_by) = client
        .query_text("RD maturity?")
        .await
        .expect("statistical query");
    assert_eq!(routed_by, "model");
    assert_eq!(
        result.department.as_deref(),
        Some("Deposit & Account Services Department")
    );
    assert_eq!(server.registry.training_runs(), 1);
    assert!(server.model_path.exists());

    let (status, _) = client.ready().await.expect("Ready should respond");
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_enrol_then_verify_face() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");
    let client = TestClient::new(server.url());

    let enrolled = client
        .embedding("/embedding/face", "image", FACE_PHOTO)
        .await
        .expect("enrolment should succeed");
    assert_eq!(enrolled.modality, "face");
    assert_eq!(enrolled.dim, 512);

    let (result, status) = client
        .verify("/verify/face", FACE_PHOTO, &enrolled.embedding, None)
        .await
        .expect("verification should succeed");
    assert!(result.is_match);
    assert!(result.similarity > 0.999);
    assert_eq!(result.threshold, 0.5);
    assert_eq!(status, "match");

    let (result, status) = client
        .verify(
            "/verify_face",
            b"a different person entirely, also long enough",
            &enrolled.embedding,
            Some(0.9),
        )
        .await
        .expect("verification should succeed");
    assert!(!result.is_match);
    assert_eq!(status, "no_match");
}

#[tokio::test]
async fn test_voice_verification_uses_voice_threshold() {
    let server = spawn_test_server(TestServerConfig {
        voice_threshold: 0.95,
        ..Default::default()
    })
    .await
    .expect("Server should start");
    let client = TestClient::new(server.url());

    let enrolled = client
        .embedding("/get_voice_embedding", "audio", VOICE_SAMPLE)
        .await
        .expect("enrolment should succeed");
    assert_eq!(enrolled.dim, 256);

    let (result, _) = client
        .verify("/verify/voice", VOICE_SAMPLE, &enrolled.embedding, None)
        .await
        .expect("verification should succeed");
    assert_eq!(result.modality, "voice");
    assert_eq!(result.threshold, 0.95);
    assert!(result.is_match);
}

#[tokio::test]
async fn test_verify_wrong_width_is_dimension_mismatch() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");
    let client = TestClient::new(server.url());

    let voice = client
        .embedding("/embedding/voice", "audio", VOICE_SAMPLE)
        .await
        .expect("enrolment should succeed");

    let err = client
        .verify("/verify/face", FACE_PHOTO, &voice.embedding, None)
        .await
        .unwrap_err();

    match err {
        TestClientError::Api(422, body) => assert_eq!(body.kind, "dimension_mismatch"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_query_text_routes_home_loan() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");
    let client = TestClient::new(server.url());

    let (result, routed_by) = client
        .query_text("What is the interest rate on home loans?")
        .await
        .expect("query should succeed");

    assert_eq!(result.department.as_deref(), Some("Loan Services Department"));
    assert_eq!(result.routed_by.as_deref(), Some("keyword"));
    assert_eq!(routed_by, "keyword");
    assert_eq!(
        result.normalized_text.as_deref(),
        Some("what is the interest rate on home loans")
    );
    assert_eq!(result.message, "Text query processed successfully.");
}

#[tokio::test]
async fn test_query_text_empty_is_input_error() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");
    let client = TestClient::new(server.url());

    let err = client.query_text("").await.unwrap_err();

    match err {
        TestClientError::Api(400, body) => {
            assert_eq!(body.kind, "input_error");
            assert_eq!(body.error, "Empty text query provided.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_query_file_hindi_transcript() {
    let server = spawn_test_server(TestServerConfig {
        transcriber: Some(Arc::new(MockTranscriber::returning(
            "मुझे शिकायत करनी है",
        ))),
        ..Default::default()
    })
    .await
    .expect("Server should start");
    let client = TestClient::new(server.url());

    let (result, _) = client
        .query_file("complaint.m4a", b"\x00\x00\x00\x20ftypM4A ")
        .await
        .expect("query should succeed");

    assert_eq!(
        result.department.as_deref(),
        Some("Customer Grievance & Fraud Resolution Department")
    );
    assert_eq!(result.message, "File query processed successfully.");
}

#[tokio::test]
async fn test_query_file_silence_is_sentinel() {
    let server = spawn_test_server(TestServerConfig {
        transcriber: Some(Arc::new(MockTranscriber::silent())),
        ..Default::default()
    })
    .await
    .expect("Server should start");
    let client = TestClient::new(server.url());

    let (result, status) = client
        .query_file("silence.mov", b"moov")
        .await
        .expect("silence is not an error");

    assert!(result.transcribed_text.is_none());
    assert!(result.department.is_none());
    assert_eq!(result.message, "Could not process file input.");
    assert_eq!(status, "unprocessed");
}

#[tokio::test]
async fn test_query_file_empty_upload() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");
    let client = TestClient::new(server.url());

    let err = client.query_file("empty.wav", b"").await.unwrap_err();

    match err {
        TestClientError::Api(400, body) => {
            assert_eq!(body.error, "Empty file received. Please provide a valid file.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_concurrent_queries_share_one_training_run() {
    let server = spawn_test_server(TestServerConfig {
        warm_model: false,
        ..Default::default()
    })
    .await
    .expect("Server should start");
    let url = server.url();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let client = TestClient::new(url.clone());
            tokio::spawn(async move { client.query_text("Eligibility criteria?").await })
        })
        .collect();

    for result in futures::future::join_all(tasks).await {
        let (response, _) = result.expect("task").expect("query");
        assert_eq!(response.department.as_deref(), Some("Loan Services Department"));
    }

    assert_eq!(server.registry.training_runs(), 1);
}
