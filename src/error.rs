//! Error type shared by every handler and the auth extractor.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication failed: No token provided")]
    AuthMissing,

    #[error("Authentication failed: Invalid token")]
    AuthInvalid,

    #[error("Authentication failed: User not found")]
    UserNotFound,

    #[error("Authentication failed: Invalid password")]
    InvalidPassword,

    #[error("Action not allowed")]
    Forbidden,

    #[error("Item not found")]
    NotFound,

    /// Malformed payload or an insert the store refused.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] sqlx::Error),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::AuthMissing | Self::AuthInvalid | Self::UserNotFound | Self::InvalidPassword => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal(e: impl std::fmt::Display) -> Self {
        Self::Internal(e.to_string())
    }

    pub fn validation(e: impl std::fmt::Display) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // auth, role and lookup outcomes answer with `message`, failures with `error`
        let body = match &self {
            Self::Validation(_) | Self::Store(_) | Self::Internal(_) => {
                json!({ "error": self.to_string() })
            }
            _ => json!({ "message": self.to_string() }),
        };

        if status.is_server_error() {
            error!(error = %self, %status, "request failed");
        }

        (status, Json(body)).into_response()
    }
}
