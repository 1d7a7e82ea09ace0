use std::collections::BTreeMap;

use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use error_types::ApiError;

/// Error body returned by the HTTP surface. The status line carries the
/// code; the body carries the machine-readable reason, the user-facing
/// message, and any metadata (omitted when empty).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            reason: err.reason.clone(),
            message: err.message.clone(),
            metadata: err.metadata.clone(),
        }
    }
}

/// Renders an already-classified error: status line from the code, JSON
/// body from the remaining fields.
pub fn api_error_response(err: &ApiError) -> Response {
    let status = StatusCode::from_u16(err.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}

/// Renders an arbitrary error, classifying it through the canonical
/// converter first.
pub fn error_response(err: &(dyn std::error::Error + 'static)) -> Response {
    api_error_response(&ApiError::from_error(err))
}

/// Axum-compatible wrapper so handlers can return `Result<T, HttpError>`
/// and surface the canonical JSON error body.
#[derive(Debug)]
pub struct HttpError(pub ApiError);

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

// A failed gRPC call surfaces on the HTTP side as the translated error.
impl From<tonic::Status> for HttpError {
    fn from(status: tonic::Status) -> Self {
        Self(ApiError::from_status(&status))
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        api_error_response(&self.0)
    }
}

/// JSON extractor that reports deserialization failures as the canonical
/// bind error instead of axum's default rejection.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(HttpError::from(
                ApiError::bind().with_message(rejection.to_string()),
            )
            .into_response()),
        }
    }
}
