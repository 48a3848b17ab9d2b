//! HTTP client helpers for tests.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn decode<T: for<'de> Deserialize<'de>>(
        resp: reqwest::Response,
    ) -> Result<(T, String), TestClientError> {
        let status_header = resp
            .headers()
            .get("x-teller-status")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let status = resp.status().as_u16();
        if status == 200 {
            return Ok((resp.json().await?, status_header));
        }

        let body = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error) => Err(TestClientError::Api(status, error)),
            Err(_) => Err(TestClientError::UnexpectedStatus(status, body)),
        }
    }

    fn media_part(file_name: &str, bytes: &[u8]) -> Part {
        Part::bytes(bytes.to_vec()).file_name(file_name.to_string())
    }

    pub async fn embedding(
        &self,
        path: &str,
        field: &str,
        bytes: &[u8],
    ) -> Result<EmbeddingResponse, TestClientError> {
        let form = Form::new().part(field.to_string(), Self::media_part("upload.bin", bytes));
        let resp = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        Ok(Self::decode(resp).await?.0)
    }

    pub async fn verify(
        &self,
        path: &str,
        bytes: &[u8],
        stored: &[f32],
        threshold: Option<f64>,
    ) -> Result<(VerifyResponse, String), TestClientError> {
        let stored = serde_json::to_string(stored).expect("embedding serializes");
        let mut form = Form::new()
            .part("image", Self::media_part("probe.bin", bytes))
            .text("embedding", stored);
        if let Some(threshold) = threshold {
            form = form.text("threshold", threshold.to_string());
        }

        let resp = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn query_text(&self, text: &str) -> Result<(QueryResponse, String), TestClientError> {
        let resp = self
            .client
            .post(self.url("/query/text"))
            .form(&[("text", text)])
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn query_file(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<(QueryResponse, String), TestClientError> {
        let form = Form::new().part("file", Self::media_part(file_name, bytes));
        let resp = self
            .client
            .post(self.url("/query/file"))
            .multipart(form)
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    /// Returns the readiness body whatever the status code.
    pub async fn ready(&self) -> Result<(u16, ReadyResponse), TestClientError> {
        let resp = self.client.get(self.url("/ready")).send().await?;
        let status = resp.status().as_u16();
        Ok((status, resp.json().await?))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ComponentStatus {
    pub http: String,
    pub storage: String,
    pub model: String,
    pub face_extractor: String,
    pub voice_extractor: String,
    pub transcriber: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub components: ComponentStatus,
}

impl ReadyResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingResponse {
    pub modality: String,
    pub dim: usize,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    pub modality: String,
    pub is_match: bool,
    pub similarity: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub transcribed_text: Option<String>,
    pub normalized_text: Option<String>,
    pub department: Option<String>,
    pub routed_by: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
    pub code: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error {0}: {1:?}")]
    Api(u16, ErrorBody),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_url_building() {
        let client = TestClient::new("http://localhost:8000");
        assert_eq!(client.url("/healthz"), "http://localhost:8000/healthz");
        assert_eq!(client.url("healthz"), "http://localhost:8000/healthz");
    }
}
