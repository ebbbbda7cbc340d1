use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Domain "not found" is kept apart from infrastructure failures so the two
/// map to different status codes and bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

/// Wraps a store failure, surfacing `message` plus the underlying error in the
/// 500 body. Used as `.map_err(internal("..."))?` in handlers.
pub fn internal(message: &'static str) -> impl FnOnce(anyhow::Error) -> ApiError {
    move |source| ApiError::Internal {
        message: message.into(),
        source,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
            }
            ApiError::Internal { message, source } => {
                error!(error = %source, "{message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": message, "error": source.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
