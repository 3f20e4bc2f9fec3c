//! Unified error handling for admin.
//!
//! API handlers return `Result<T, AppError>`; errors are rendered as a JSON
//! body `{ "error": ..., "field": ... }` where `field` names the rejected
//! input for validation failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use vitrine_core::validation::ValidationError;
use vitrine_data::{RepositoryError, StorageError};

use crate::models::CurrentAdmin;
use crate::services::IdentityError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Document store operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Object storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Identity provider call failed.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Session could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Input failed validation before any backend call.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request conflicts with current data.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound)
            | Self::Storage(StorageError::NotFound(_))
            | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(RepositoryError::InvalidPatch(_))
            | Self::Storage(StorageError::InvalidPath(_))
            | Self::Validation(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Identity(e) if e.is_client_error() => StatusCode::UNAUTHORIZED,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Storage(_) | Self::Identity(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the client.
    fn public_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(message)) => message.clone(),
            Self::Validation(e) => e.to_string(),
            Self::Identity(e) if e.is_client_error() => e.to_string(),
            _ if self.status() == StatusCode::BAD_GATEWAY => "External service error".to_string(),
            _ if self.status().is_server_error() => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let field = match &self {
            Self::Validation(e) => Some(e.field()),
            _ => None,
        };

        let body = ErrorBody {
            error: self.public_message(),
            field,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Attach the signed-in admin to Sentry events.
pub fn set_sentry_user(admin: &CurrentAdmin) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin.uid.clone()),
            email: Some(admin.email.clone()),
            ..Default::default()
        }));
    });
}

/// Forget the Sentry user after logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| scope.set_user(None));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Database(RepositoryError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Database(RepositoryError::Conflict("in use".to_string())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Validation(ValidationError::NonPositivePrice).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Identity(IdentityError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Identity(IdentityError::UnexpectedResponse(String::new())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Storage(StorageError::NotFound("x".to_string())).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_validation_body_names_field() {
        let response = AppError::Validation(ValidationError::MissingCategory).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["field"], "categoryId");
        assert_eq!(body["error"], "category is required");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let response = AppError::Internal("pool exhausted at db-1".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal server error");
        assert!(body.get("field").is_none());
    }
}
