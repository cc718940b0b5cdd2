//! JSON extractor whose rejections use the submission failure envelope

use crate::models::SubmissionResult;
use axum::{
    async_trait,
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

const MALFORMED_MESSAGE: &str = "예약 정보를 읽을 수 없습니다. 입력 내용을 확인해주세요.";

/// Like [`Json`], but a bad body becomes `{ success: false, error }` instead
/// of axum's plain-text rejection.
pub struct EnvelopeJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for EnvelopeJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = EnvelopeJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(EnvelopeJson(value)),
            Err(rejection) => Err(EnvelopeJsonRejection::from(rejection)),
        }
    }
}

#[derive(Debug)]
pub enum EnvelopeJsonRejection {
    MissingContentType,
    InvalidBody(String),
    Other(String),
}

impl From<JsonRejection> for EnvelopeJsonRejection {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => EnvelopeJsonRejection::MissingContentType,
            JsonRejection::JsonDataError(e) => EnvelopeJsonRejection::InvalidBody(e.body_text()),
            JsonRejection::JsonSyntaxError(e) => EnvelopeJsonRejection::InvalidBody(e.body_text()),
            other => EnvelopeJsonRejection::Other(other.body_text()),
        }
    }
}

impl IntoResponse for EnvelopeJsonRejection {
    fn into_response(self) -> Response {
        let status = match &self {
            EnvelopeJsonRejection::MissingContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            EnvelopeJsonRejection::InvalidBody(_) | EnvelopeJsonRejection::Other(_) => {
                StatusCode::BAD_REQUEST
            }
        };
        tracing::warn!(status = status.as_u16(), "Rejected reservation body: {}", self);

        (status, Json(SubmissionResult::failure(MALFORMED_MESSAGE))).into_response()
    }
}

impl std::fmt::Display for EnvelopeJsonRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvelopeJsonRejection::MissingContentType => write!(f, "expected application/json"),
            EnvelopeJsonRejection::InvalidBody(msg) => write!(f, "Invalid JSON: {}", msg),
            EnvelopeJsonRejection::Other(msg) => write!(f, "JSON error: {}", msg),
        }
    }
}

impl std::error::Error for EnvelopeJsonRejection {}
