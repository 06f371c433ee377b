//! HTTP-facing error type and its mapping onto status codes.
//!
//! Handlers return [`AppResult`]; any [`CoreError`] or [`sqlx::Error`] that
//! bubbles up is turned into a `{ "error", "code" }` JSON body here. Database
//! errors never leak their message to the client; constraint violations are
//! recognized by Postgres error code and surfaced as 409/400 instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use shutterdesk_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Stable machine-readable codes carried alongside the HTTP status.
mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION: &str = "VALIDATION_ERROR";
    pub const CONFLICT: &str = "CONFLICT";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const INTERNAL: &str = "INTERNAL_ERROR";
}

impl AppError {
    fn status_code_and_body(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                codes::NOT_FOUND,
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, codes::VALIDATION, msg.clone())
            }
            AppError::Core(CoreError::Conflict(msg)) => {
                (StatusCode::CONFLICT, codes::CONFLICT, msg.clone())
            }
            AppError::Core(CoreError::Internal(msg)) => {
                tracing::error!(error = %msg, "Internal core error");
                internal()
            }
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, codes::BAD_REQUEST, msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.status_code_and_body();
        let body = json!({
            "error": message,
            "code": code,
        });
        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        codes::INTERNAL,
        "An internal error occurred".to_string(),
    )
}

/// Map a sqlx error onto an HTTP response.
///
/// `RowNotFound` becomes 404. Unique violations (23505) on a `uq_`-named
/// constraint become 409, so a duplicate project code reads as a conflict
/// rather than a server fault. Foreign key violations (23503) become 400:
/// the client referenced a row that does not exist. Anything else is a
/// sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            codes::NOT_FOUND,
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    (
                        StatusCode::CONFLICT,
                        codes::CONFLICT,
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    )
                } else {
                    tracing::error!(error = %db_err, "Database error");
                    internal()
                }
            }
            Some("23503") => (
                StatusCode::BAD_REQUEST,
                codes::VALIDATION,
                "Referenced row does not exist".to_string(),
            ),
            _ => {
                tracing::error!(error = %db_err, "Database error");
                internal()
            }
        },
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
