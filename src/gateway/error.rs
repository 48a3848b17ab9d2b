use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{FormRejection, PathRejection},
    },
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::TELLER_STATUS_HEADER;
use crate::router::RouterError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request body or path could not be extracted.
    #[error("invalid request body: {reason}")]
    Rejected { status: StatusCode, reason: String },

    #[error(transparent)]
    Router(#[from] RouterError),
}

impl From<MultipartError> for GatewayError {
    fn from(err: MultipartError) -> Self {
        GatewayError::Rejected {
            status: err.status(),
            reason: err.body_text(),
        }
    }
}

impl From<MultipartRejection> for GatewayError {
    fn from(err: MultipartRejection) -> Self {
        GatewayError::Rejected {
            status: err.status(),
            reason: err.body_text(),
        }
    }
}

impl From<FormRejection> for GatewayError {
    fn from(err: FormRejection) -> Self {
        GatewayError::Rejected {
            status: err.status(),
            reason: err.body_text(),
        }
    }
}

impl From<PathRejection> for GatewayError {
    fn from(err: PathRejection) -> Self {
        GatewayError::Rejected {
            status: err.status(),
            reason: err.body_text(),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
    pub code: u16,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Rejected { status, .. } => *status,
            GatewayError::Router(e) => match e {
                RouterError::Input(_) => StatusCode::BAD_REQUEST,
                RouterError::Extraction(_) | RouterError::DimensionMismatch(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                RouterError::Transcription(_) => StatusCode::BAD_GATEWAY,
                RouterError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                RouterError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                RouterError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) | GatewayError::Rejected { .. } => "input_error",
            GatewayError::Router(e) => e.kind(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        let error = self.to_string();

        if status.is_server_error() {
            tracing::error!(kind, error = %error, "Request failed");
        } else {
            tracing::debug!(kind, error = %error, "Request rejected");
        }

        let mut headers = HeaderMap::new();
        headers.insert(TELLER_STATUS_HEADER, HeaderValue::from_static(kind));

        let body = Json(ErrorResponse {
            error,
            kind,
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
