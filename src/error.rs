use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Startup failures. Any of these aborts the process.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("unable to parse database URL: {0}")]
    DatabaseUrl(#[source] sqlx::Error),
    #[error("unable to ping database: {0}")]
    DatabasePing(#[source] sqlx::Error),
    #[error("could not parse Redis URL: {0}")]
    RedisUrl(#[source] redis::RedisError),
    #[error("could not ping Redis: {0}")]
    RedisPing(#[source] redis::RedisError),
    #[error("{what} did not answer within {secs}s")]
    Timeout { what: &'static str, secs: u64 },
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Error returned by handlers; rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}
