use axum::extract::rejection::PathRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog_core::error::CoreError;
use catalog_core::product::ENTITY;
use catalog_db::StoreError;

use crate::response::ErrorResponse;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures. Implements [`IntoResponse`] to produce the
/// `{ "success": false, "error": ... }` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `catalog_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence error from `catalog_db`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// A path segment that axum could not decode is an unusable identifier.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Core(CoreError::InvalidIdentifier {
            entity: ENTITY,
            raw: rejection.body_text(),
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => {
                    (StatusCode::NOT_FOUND, format!("{entity} not found"))
                }
                CoreError::InvalidIdentifier { entity, raw } => {
                    tracing::debug!(raw = %raw, "Unparsable identifier");
                    (
                        StatusCode::BAD_REQUEST,
                        format!("Invalid {} ID format", entity.to_lowercase()),
                    )
                }
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
                }
            },

            // --- Persistence errors ---
            AppError::Store(err) => {
                tracing::error!(error = %err, "Store error");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
        };

        (status, axum::Json(ErrorResponse::new(message))).into_response()
    }
}
