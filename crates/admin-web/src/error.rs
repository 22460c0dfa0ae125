//! Error types for the admin web interface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use broadcaster::{BroadcastError, Notice};
use database::{DatabaseError, ValidationError};
use thiserror::Error;

use crate::auth::AuthErrorCode;

/// Errors that can occur in the admin web interface.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Sign-in, sign-up, or session failure.
    #[error("Authentication error: {}", .0.code())]
    Auth(AuthErrorCode),

    /// Rejected input.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// A preference or prompt save was aborted.
    #[error("Broadcast error: {0}")]
    Broadcast(#[from] BroadcastError),

    /// Agent provider error outside a fan-out.
    #[error("Provider error: {0}")]
    Provider(#[from] agent_provider::ProviderError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    pub fn status(&self) -> StatusCode {
        match self {
            AdminError::Auth(code) => code.status(),
            AdminError::Validation(_) => StatusCode::BAD_REQUEST,
            AdminError::Database(DatabaseError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AdminError::Database(DatabaseError::AlreadyExists { .. }) => StatusCode::CONFLICT,
            AdminError::Broadcast(
                BroadcastError::SaveAdmin(DatabaseError::NotFound { .. })
                | BroadcastError::SaveSkeleton(DatabaseError::NotFound { .. }),
            ) => StatusCode::NOT_FOUND,
            AdminError::Broadcast(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AdminError::Provider(_) => StatusCode::BAD_GATEWAY,
            AdminError::Database(_) | AdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The operator-facing text for this error.
    pub fn user_message(&self) -> String {
        match self {
            AdminError::Auth(code) => code.message().to_string(),
            AdminError::Validation(err) => err.to_string(),
            AdminError::Database(DatabaseError::NotFound { entity, .. }) => {
                format!("{} not found.", entity)
            }
            AdminError::Database(_) => "Could not load data. Please try again.".to_string(),
            AdminError::Broadcast(err) => match err {
                BroadcastError::SaveAdmin(_) | BroadcastError::Encode(_) => {
                    "Could not save preferences. Please try again.".to_string()
                }
                BroadcastError::SaveSkeleton(_) => {
                    "Could not save prompt. Please try again.".to_string()
                }
                BroadcastError::ListPromptAgents(_) => {
                    "Your prompt was saved but could not be applied to all agents. Please save again."
                        .to_string()
                }
                BroadcastError::ListMirrors(_) | BroadcastError::CommitMirrors { .. } => {
                    "Your preferences were saved but could not be applied to all users. Please save again."
                        .to_string()
                }
            },
            AdminError::Provider(_) => "The voice provider is unavailable.".to_string(),
            AdminError::Internal(_) => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// Transient notification for this error.
    pub fn notice(&self) -> Notice {
        Notice::error(self.user_message())
    }

    /// Log at the level this error deserves.
    pub fn log(&self) {
        match self {
            AdminError::Auth(_) | AdminError::Validation(_) => {
                tracing::debug!("Rejected request: {}", self)
            }
            _ => tracing::error!("{}", self),
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        self.log();

        let body = serde_json::json!({
            "error": self.user_message(),
            "notice": self.notice(),
        });

        (self.status(), Json(body)).into_response()
    }
}

/// Result type for admin operations.
pub type Result<T> = std::result::Result<T, AdminError>;
