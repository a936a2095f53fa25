use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use kwabo_core::error::CoreError;
use kwabo_core::publish::ErrorBody;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the `{ success: false, ... }`
/// envelope every endpoint shares.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `kwabo_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    ErrorBody::new(format!("{entity} with id {id} not found")),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, ErrorBody::new(msg.clone()))
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody::new(msg.clone())),
                CoreError::QuotaExceeded { current, max } => (
                    StatusCode::FORBIDDEN,
                    ErrorBody::quota(
                        format!(
                            "Limite de publication atteinte ({current}/{max} annonces). \
                             Supprimez une annonce existante pour en publier une nouvelle."
                        ),
                        *current,
                        *max,
                    ),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorBody::new("Une erreur interne est survenue"),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new(msg.clone())),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Une erreur interne est survenue"),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status and error envelope.
///
/// - `RowNotFound` maps to 404.
/// - A unique violation on `uq_owners_email` maps to 409 with the
///   duplicate-owner message, other `uq_` constraints to a generic 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, ErrorBody) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("Ressource introuvable"),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint == "uq_owners_email" {
                    return (
                        StatusCode::CONFLICT,
                        ErrorBody::new(
                            "Un compte propriétaire existe déjà avec cette adresse e-mail",
                        ),
                    );
                }
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        ErrorBody::new(format!(
                            "Duplicate value violates unique constraint: {constraint}"
                        )),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Une erreur interne est survenue"),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Une erreur interne est survenue"),
            )
        }
    }
}
