//! Unified error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>` for JSON and plain responses, and
//! `Result<T, PageError>` for HTML pages so failures render a localized error
//! page instead of bare text.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use vitrine_core::Locale;
use vitrine_core::validation::ValidationError;
use vitrine_data::RepositoryError;

use crate::filters;
use crate::messages::Messages;
use crate::views::PageContext;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Document store operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Capture server errors to Sentry and log them.
    fn report(&self) {
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report();

        // Don't expose internal error details to clients
        let message = if self.status().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (self.status(), message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// An [`AppError`] raised while rendering an HTML page in `locale`.
#[derive(Debug)]
pub struct PageError {
    pub locale: Locale,
    pub error: AppError,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    page: PageContext,
    heading: &'static str,
    detail: &'static str,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        self.error.report();

        let status = self.error.status();
        let t = Messages::for_locale(self.locale);
        let (heading, detail) = if status == StatusCode::NOT_FOUND {
            (t.not_found_title, t.not_found_text)
        } else if status.is_server_error() {
            (t.server_error_title, t.server_error_text)
        } else {
            (t.bad_request_title, t.bad_request_text)
        };

        let template = ErrorTemplate {
            page: PageContext::new(self.locale, "/"),
            heading,
            detail,
        };
        let body = template
            .render()
            .unwrap_or_else(|_| heading.to_string());

        (status, Html(body)).into_response()
    }
}

/// Attach the request locale to an error so it renders as a localized page.
pub trait Localized<T> {
    /// # Errors
    ///
    /// Returns the original error wrapped in a [`PageError`].
    fn localized(self, locale: Locale) -> std::result::Result<T, PageError>;
}

impl<T, E: Into<AppError>> Localized<T> for std::result::Result<T, E> {
    fn localized(self, locale: Locale) -> std::result::Result<T, PageError> {
        self.map_err(|e| PageError {
            locale,
            error: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Validation(ValidationError::MissingCategory)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_page_error_is_localized() {
        let response = PageError {
            locale: Locale::En,
            error: AppError::NotFound("x".to_string()),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
