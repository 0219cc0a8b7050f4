use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub const NOT_FOUND_MESSAGE: &str = "Bookmark Not Found";
pub const EMPTY_PATCH_MESSAGE: &str =
    "Request body must contain either 'title', 'url', 'rating', or 'description'";
pub const SERVER_ERROR_MESSAGE: &str = "server error";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized request";

// === BookmarkError ===

/// Errors raised by the bookmark data access layer.
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// Storage-level fault (connectivity, constraint violation, malformed row).
    #[error("Bookmark database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// The blocking storage task panicked or was cancelled.
    #[error("Bookmark storage task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

// === ValidationError ===

/// A single inbound field that failed validation.
///
/// The display string is the exact message returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("A title is required")]
    Title,
    #[error("A valid url is required")]
    Url,
    #[error("A rating between 1 and 5 is required")]
    Rating,
}

// === ApiError ===

/// Every failure the request handler can turn into an HTTP response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Create or patch payload carried a bad field value.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The id in the path resolves to no bookmark.
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,
    /// PATCH body contained none of the updatable fields.
    #[error("{}", EMPTY_PATCH_MESSAGE)]
    EmptyPatch,
    /// Missing or wrong bearer token.
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,
    /// Storage fault bubbling up to the error boundary.
    #[error(transparent)]
    Storage(#[from] BookmarkError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            // Validation failures answer 404; existing clients assert on it.
            ApiError::Validation(_) => StatusCode::NOT_FOUND,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::EmptyPatch => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Unauthorized => json!({ "error": UNAUTHORIZED_MESSAGE }),
            ApiError::Storage(err) => {
                tracing::error!(error = %err, "storage failure");
                json!({ "error": { "message": SERVER_ERROR_MESSAGE } })
            }
            other => json!({ "error": { "message": other.to_string() } }),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
