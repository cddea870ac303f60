use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce the small HTML error pages the
/// directory browser shows in place of a listing.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request tried to reach outside the inspections root or asked
    /// for a disallowed file type.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested path does not exist under the inspections root.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An unexpected filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "403 Forbidden", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "404 Not Found", msg.clone()),
            AppError::Io(err) => {
                tracing::error!(error = %err, "Filesystem error while serving request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "500 Internal Server Error",
                    "An internal error occurred.".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "500 Internal Server Error",
                    "An internal error occurred.".to_string(),
                )
            }
        };

        let body = format!("<h1>{title}</h1><p>{message}</p>");
        (status, Html(body)).into_response()
    }
}
