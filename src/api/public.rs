//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::ai::RelayError;

/// Generic messages returned to clients. Upstream details never leave
/// the server.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";
pub const UPSTREAM_ERROR_MESSAGE: &str = "Upstream API error";

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// Errors

pub struct ApiError(anyhow::Error);

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Always log the error
        tracing::error!("{:#}", self.0);

        let (status, message) = match self.0.downcast_ref::<RelayError>() {
            Some(RelayError::InvalidRequest(msg)) => (StatusCode::BAD_REQUEST, msg.as_str()),
            Some(RelayError::UpstreamRejected { status, body }) => {
                tracing::error!("Upstream error response ({}): {}", status, body);
                (StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_ERROR_MESSAGE)
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` or `Result<_, RelayError>` to turn them into
/// `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}

pub mod languages {
    pub use crate::api::routes::languages::public::*;
}
