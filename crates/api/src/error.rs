use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tienda_core::error::CoreError;
use tienda_db::StoreError;

/// Status used for duplicate-email conflicts.
///
/// Existing clients of this API expect 400 here rather than 409.
pub const CONFLICT_STATUS: StatusCode = StatusCode::BAD_REQUEST;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures. Implements [`IntoResponse`] to produce consistent JSON bodies of
/// the form `{ "mensaje": ..., "code": ... }`; internal errors also carry an
/// `error` field with the underlying message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tienda_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence error from `tienda_db`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Generic message returned with every 500.
const INTERNAL_MESSAGE: &str = "Error interno del servidor";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                    None,
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
                }
                CoreError::InvalidCredentials(msg) => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_CREDENTIALS",
                    msg.clone(),
                    None,
                ),
                CoreError::Conflict(msg) => (CONFLICT_STATUS, "CONFLICT", msg.clone(), None),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
                }
                CoreError::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None)
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal(msg.clone())
                }
            },

            // --- Store errors ---
            AppError::Store(StoreError::DuplicateEmail(_)) => (
                CONFLICT_STATUS,
                "CONFLICT",
                "El usuario ya existe".to_string(),
                None,
            ),
            AppError::Store(err @ StoreError::Database(_)) => {
                tracing::error!(error = %err, "Database error");
                internal(err.to_string())
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None),
        };

        let mut body = json!({
            "mensaje": message,
            "code": code,
        });
        if let Some(detail) = detail {
            body["error"] = json!(detail);
        }

        (status, axum::Json(body)).into_response()
    }
}

fn internal(detail: String) -> (StatusCode, &'static str, String, Option<String>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
        Some(detail),
    )
}
