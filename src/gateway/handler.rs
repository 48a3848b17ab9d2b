use std::collections::HashMap;

use axum::{
    Form, Json,
    extract::{
        Multipart, Path, State,
        multipart::MultipartRejection,
        rejection::{FormRejection, PathRejection},
    },
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::TELLER_STATUS_HEADER;
use super::error::GatewayError;
use super::state::HandlerState;
use crate::embedding::{Embedding, Modality};
use crate::router::{ClassificationResult, Probe, RouterError, VerifyRequest};

/// Multipart field names accepted for the uploaded media.
pub const MEDIA_FIELDS: &[&str] = &["image", "audio", "file", "media"];

/// Field holding the stored reference embedding as a JSON array.
pub const STORED_EMBEDDING_FIELDS: &[&str] = &["embedding", "stored_embedding"];

pub const PROBE_EMBEDDING_FIELD: &str = "probe_embedding";
pub const THRESHOLD_FIELD: &str = "threshold";

// Extractor rejections surface as `GatewayError`.
type MultipartBody = Result<Multipart, MultipartRejection>;
type ModalityPath = Result<Path<String>, PathRejection>;

#[derive(Debug, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    pub modality: Modality,
    pub dim: usize,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextQuery {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug)]
pub(crate) struct Upload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// A parsed multipart body: at most one media upload plus text fields.
#[derive(Debug, Default)]
pub(crate) struct UploadForm {
    pub media: Option<Upload>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn read(multipart: MultipartBody) -> Result<Self, GatewayError> {
        let mut multipart = multipart?;
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if MEDIA_FIELDS.contains(&name.as_str()) {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                form.media = Some(Upload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    fn field(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .find_map(|name| self.fields.get(*name))
            .map(String::as_str)
    }

    fn require_media(&mut self) -> Result<Upload, GatewayError> {
        self.media.take().ok_or_else(missing_media)
    }
}

fn missing_media() -> GatewayError {
    GatewayError::InvalidRequest(format!(
        "missing media upload (expected one of: {})",
        MEDIA_FIELDS.join(", ")
    ))
}

fn parse_modality(path: ModalityPath) -> Result<Modality, GatewayError> {
    let Path(raw) = path?;
    raw.parse().map_err(GatewayError::InvalidRequest)
}

fn parse_embedding(raw: &str) -> Result<Embedding, GatewayError> {
    Embedding::from_json(raw).map_err(|e| GatewayError::Router(RouterError::from(e)))
}

fn with_status<T: Serialize>(status: &'static str, body: T) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(TELLER_STATUS_HEADER, HeaderValue::from_static(status));
    (StatusCode::OK, headers, Json(body)).into_response()
}

#[instrument(skip(state, multipart))]
pub async fn embedding_handler(
    State(state): State<HandlerState>,
    modality: ModalityPath,
    multipart: MultipartBody,
) -> Result<Response, GatewayError> {
    let modality = parse_modality(modality)?;
    extract(state, modality, multipart).await
}

#[instrument(skip(state, multipart))]
pub async fn verify_handler(
    State(state): State<HandlerState>,
    modality: ModalityPath,
    multipart: MultipartBody,
) -> Result<Response, GatewayError> {
    let modality = parse_modality(modality)?;
    verify(state, modality, multipart).await
}

pub async fn face_embedding_handler(
    State(state): State<HandlerState>,
    multipart: MultipartBody,
) -> Result<Response, GatewayError> {
    extract(state, Modality::Face, multipart).await
}

pub async fn voice_embedding_handler(
    State(state): State<HandlerState>,
    multipart: MultipartBody,
) -> Result<Response, GatewayError> {
    extract(state, Modality::Voice, multipart).await
}

pub async fn verify_face_handler(
    State(state): State<HandlerState>,
    multipart: MultipartBody,
) -> Result<Response, GatewayError> {
    verify(state, Modality::Face, multipart).await
}

pub async fn verify_voice_handler(
    State(state): State<HandlerState>,
    multipart: MultipartBody,
) -> Result<Response, GatewayError> {
    verify(state, Modality::Voice, multipart).await
}

async fn extract(
    state: HandlerState,
    modality: Modality,
    multipart: MultipartBody,
) -> Result<Response, GatewayError> {
    let media = UploadForm::read(multipart).await?.require_media()?;
    debug!(%modality, media_len = media.bytes.len(), "Embedding requested");

    let embedding = state
        .router
        .extract_embedding(modality, media.bytes)
        .await?;

    Ok(with_status(
        "extracted",
        EmbeddingResponse {
            modality,
            dim: embedding.dim(),
            embedding: embedding.into_inner(),
        },
    ))
}

async fn verify(
    state: HandlerState,
    modality: Modality,
    multipart: MultipartBody,
) -> Result<Response, GatewayError> {
    let mut form = UploadForm::read(multipart).await?;

    let stored = form
        .field(STORED_EMBEDDING_FIELDS)
        .ok_or_else(|| {
            GatewayError::InvalidRequest("missing stored embedding field `embedding`".to_string())
        })
        .and_then(parse_embedding)?;

    let threshold = form
        .field(&[THRESHOLD_FIELD])
        .map(|raw| {
            raw.trim().parse::<f64>().map_err(|e| {
                GatewayError::InvalidRequest(format!("invalid threshold '{}': {}", raw, e))
            })
        })
        .transpose()?;

    let probe_embedding = form
        .field(&[PROBE_EMBEDDING_FIELD])
        .map(parse_embedding)
        .transpose()?;

    // an uploaded sample takes precedence over a pre-computed probe
    let probe = match (form.media.take(), probe_embedding) {
        (Some(media), _) => Probe::Media(media.bytes),
        (None, Some(embedding)) => Probe::Embedding(embedding),
        (None, None) => return Err(missing_media()),
    };

    let result = state
        .router
        .verify(VerifyRequest {
            modality,
            probe,
            stored,
            threshold,
        })
        .await?;

    let status = if result.is_match { "match" } else { "no_match" };
    Ok(with_status(status, result))
}

#[instrument(skip(state, query))]
pub async fn query_text_handler(
    State(state): State<HandlerState>,
    query: Result<Form<TextQuery>, FormRejection>,
) -> Result<Response, GatewayError> {
    let Form(query) = query?;
    let result = state.router.classify_text(&query.text).await?;
    Ok(classification_response(result))
}

#[instrument(skip(state, multipart))]
pub async fn query_file_handler(
    State(state): State<HandlerState>,
    multipart: MultipartBody,
) -> Result<Response, GatewayError> {
    let media = UploadForm::read(multipart).await?.require_media()?;
    let file_name = media.file_name.unwrap_or_default();
    debug!(%file_name, media_len = media.bytes.len(), "File query received");

    let result = state.router.classify_file(media.bytes, &file_name).await?;
    Ok(classification_response(result))
}

fn classification_response(result: ClassificationResult) -> Response {
    let status = match result.routed_by {
        Some(routed_by) => routed_by.as_str(),
        None => "unprocessed",
    };
    with_status(status, result)
}
