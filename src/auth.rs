use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::app::App;
use crate::types::errors::ApiError;

/// Rejects requests whose `Authorization: Bearer` token does not match the configured one.
///
/// Passes everything through when no token is configured.
pub async fn require_bearer_token(
    State(app): State<Arc<App>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(expected) = app.api_token.as_deref() {
        if bearer_token(request.headers()) != Some(expected) {
            tracing::error!(path = %request.uri().path(), "Unauthorized request");
            return ApiError::Unauthorized.into_response();
        }
    }
    next.run(request).await
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
