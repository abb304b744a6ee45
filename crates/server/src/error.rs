//! Unified error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. Every error renders as
//! `{"error": "<message>"}`; server-side failures are captured to Sentry and
//! reported to clients with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::catalog::CatalogError;

/// Application-level error type for the catalog service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Malformed or incomplete request body.
    #[error("{0}")]
    BadRequest(String),

    /// The route exists but not for this method.
    #[error("Invalid request method")]
    MethodNotAllowed,
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl From<CatalogError> for AppError {
    /// Everything but a missing product is reported back as a 400 carrying
    /// the error text, database failures included.
    fn from(err: CatalogError) -> Self {
        if matches!(err, CatalogError::ProductNotFound) {
            return Self::NotFound(err.to_string());
        }

        tracing::warn!(error = %err, "Rejected catalog request");
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Product not found".to_string());
        assert_eq!(err.to_string(), "Product not found");

        assert_eq!(
            AppError::MethodNotAllowed.to_string(),
            "Invalid request method"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::MethodNotAllowed),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_catalog_errors_map_to_client_errors() {
        assert!(matches!(
            AppError::from(CatalogError::ProductNotFound),
            AppError::NotFound(msg) if msg == "Product not found"
        ));
        assert!(matches!(
            AppError::from(CatalogError::MissingField("image")),
            AppError::BadRequest(msg) if msg == "missing field `image`"
        ));

        let json_err = serde_json::from_slice::<serde_json::Value>(b"{").unwrap_err();
        assert!(matches!(
            AppError::from(CatalogError::Json(json_err)),
            AppError::BadRequest(_)
        ));
    }

    #[test]
    fn test_catalog_database_failure_is_bad_request() {
        let err = CatalogError::Repository(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        let app_err = AppError::from(err);
        assert!(matches!(&app_err, AppError::BadRequest(msg) if msg.starts_with("database error")));
        assert_eq!(app_err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
