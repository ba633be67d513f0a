use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::error::{AuthError, ProviderError, ServiceError, StoreError, ValidationError};

/// Error type of every HTTP handler.
///
/// Responses always carry a JSON body of the form `{"detail": ...}`.
/// Provider and token endpoint failures keep their upstream status and body;
/// store failures are logged and reported without their cause.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    fn status_and_detail(&self) -> (StatusCode, Value) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!(msg)),
            ApiError::Provider(e) => (
                upstream_status(e.status),
                serde_json::to_value(&e.body).unwrap_or_else(|_| json!("internal error")),
            ),
            ApiError::Auth(AuthError::Upstream { status, body }) => {
                (upstream_status(*status), json!(body))
            }
            ApiError::Auth(AuthError::Transport) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!("internal error"))
            }
            ApiError::Auth(AuthError::InvalidResponse(_)) => (
                StatusCode::BAD_GATEWAY,
                json!("Unexpected token response from Spotify"),
            ),
            ApiError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!("data store unavailable"),
            ),
            ApiError::Validation(e) => (StatusCode::INTERNAL_SERVER_ERROR, json!(e.to_string())),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Provider(e) => ApiError::Provider(e),
            ServiceError::Store(e) => ApiError::Store(e),
            ServiceError::Validation(e) => ApiError::Validation(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        }
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

fn upstream_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
