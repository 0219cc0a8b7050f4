//! HTTP handlers for the bookmark resource.
//!
//! Id-scoped routes run in two phases: [`resolve_bookmark`] turns the path id
//! into a stored record or short-circuits with 404, then the verb-specific
//! logic runs against the found record only.
//!
//! rusqlite calls block, so every storage step runs on tokio's blocking pool
//! through [`with_bookmarks`]. The connection guard never leaves that thread.

use axum::body::Bytes;
use axum::extract::{OriginalUri, Path, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use crate::app::App;
use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use crate::services::serializer::{serialize_bookmark, serialize_bookmarks};
use crate::services::validator::{body_fields, validate_new_bookmark, validate_patch};
use crate::types::bookmark::{Bookmark, SerializedBookmark};
use crate::types::errors::{ApiError, ApiResult, BookmarkError};

/// `GET /api/bookmark`
pub async fn list_bookmarks(
    State(app): State<Arc<App>>,
) -> ApiResult<Json<Vec<SerializedBookmark>>> {
    let bookmarks = with_bookmarks(&app, |manager| manager.list_bookmarks()).await?;
    Ok(Json(serialize_bookmarks(&bookmarks)))
}

/// `POST /api/bookmark`
pub async fn create_bookmark(
    State(app): State<Arc<App>>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> ApiResult<Response> {
    let fields = body_fields(&body);
    let draft = validate_new_bookmark(&fields).map_err(|err| {
        tracing::error!(error = %err, "bookmark create rejected");
        ApiError::from(err)
    })?;

    let created = with_bookmarks(&app, move |manager| manager.insert_bookmark(&draft)).await?;
    tracing::info!(id = created.id, "bookmark created");

    let location = item_location(uri.path(), created.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(serialize_bookmark(&created)),
    )
        .into_response())
}

/// `GET /api/bookmark/:id`
pub async fn get_bookmark(
    State(app): State<Arc<App>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<SerializedBookmark>> {
    let bookmark = resolve_bookmark(&app, &raw_id).await?;
    Ok(Json(serialize_bookmark(&bookmark)))
}

/// `PATCH /api/bookmark/:id`
pub async fn patch_bookmark(
    State(app): State<Arc<App>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let bookmark = resolve_bookmark(&app, &raw_id).await?;

    let fields = body_fields(&body);
    let patch = validate_patch(&fields).map_err(|err| {
        tracing::error!(id = bookmark.id, error = %err, "bookmark update rejected");
        ApiError::from(err)
    })?;
    if patch.is_empty() {
        tracing::error!(id = bookmark.id, "bookmark update without fields");
        return Err(ApiError::EmptyPatch);
    }

    let id = bookmark.id;
    with_bookmarks(&app, move |manager| manager.update_bookmark(id, &patch)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/bookmark/:id`
pub async fn delete_bookmark(
    State(app): State<Arc<App>>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode> {
    let bookmark = resolve_bookmark(&app, &raw_id).await?;

    let id = bookmark.id;
    with_bookmarks(&app, move |manager| manager.delete_bookmark(id)).await?;
    tracing::info!("Bookmark with id {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Loads the bookmark named by the path id, or fails with [`ApiError::NotFound`].
///
/// An id that is not an integer cannot name a stored bookmark and gets the same 404.
pub async fn resolve_bookmark(app: &App, raw_id: &str) -> ApiResult<Bookmark> {
    let found = match raw_id.parse::<i64>() {
        Ok(id) => with_bookmarks(app, move |manager| manager.get_bookmark(id)).await?,
        Err(_) => None,
    };

    found.ok_or_else(|| {
        tracing::error!("Bookmark with id {} not found.", raw_id);
        ApiError::NotFound
    })
}

/// Runs `op` against a [`BookmarkManager`] on the blocking pool.
pub async fn with_bookmarks<T, F>(app: &App, op: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut BookmarkManager<'_>) -> Result<T, BookmarkError> + Send + 'static,
{
    let db = Arc::clone(&app.db);
    let outcome = tokio::task::spawn_blocking(move || {
        let conn = db.connection();
        let mut manager = BookmarkManager::new(&conn);
        op(&mut manager)
    })
    .await
    .map_err(BookmarkError::from)?;
    Ok(outcome?)
}

/// Item path for a new bookmark: the collection path the request came in on plus `/<id>`.
pub fn item_location(collection_path: &str, id: i64) -> String {
    format!("{}/{}", collection_path.trim_end_matches('/'), id)
}
