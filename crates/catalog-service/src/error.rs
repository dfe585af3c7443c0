//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding. Every failure is rendered as the JSON body
//! `{"success": false, "message": "..."}` so clients can always read a
//! message, whatever the status.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use verto_core::api::ApiError;

use crate::catalog::CatalogLoadError;

/// Application-level error type for the catalog service.
#[derive(Debug, Error)]
pub enum AppError {
    /// The catalog could not be loaded. `message` is what the client sees.
    #[error("{message}: {source}")]
    Catalog {
        message: &'static str,
        #[source]
        source: CatalogLoadError,
    },

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Adapter for `map_err` that tags a catalog failure with a client message.
    pub fn catalog(message: &'static str) -> impl FnOnce(CatalogLoadError) -> Self {
        move |source| Self::Catalog { message, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Catalog { message, .. } => {
                // Capture server errors to Sentry
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Request error"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, (*message).to_string())
            }
            Self::BadRequest(message) => {
                tracing::warn!(%message, "Rejected request");
                (StatusCode::BAD_REQUEST, message.clone())
            }
        };

        (status, Json(ApiError::new(message))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
