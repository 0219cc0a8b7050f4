//! Route table and transport layers.

use axum::extract::State;
use axum::http::header::HeaderName;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

use crate::app::App;
use crate::auth::require_bearer_token;
use crate::types::errors::BookmarkError;
use crate::bookmark_handler::{
    create_bookmark, delete_bookmark, get_bookmark, list_bookmarks, patch_bookmark,
};

pub const SERVICE_NAME: &str = "bookmarks-api";
pub const BOOKMARKS_PATH: &str = "/api/bookmark";

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
}

/// Full application router: bookmark routes behind the bearer check, plus `/healthz`.
pub fn build_router(app: Arc<App>) -> Router {
    let api = Router::new()
        .route(BOOKMARKS_PATH, get(list_bookmarks).post(create_bookmark))
        .route(
            &format!("{BOOKMARKS_PATH}/:id"),
            get(get_bookmark).patch(patch_bookmark).delete(delete_bookmark),
        )
        .route_layer(middleware::from_fn_with_state(app.clone(), require_bearer_token));

    let router = Router::new()
        .route("/healthz", get(healthz))
        .merge(api)
        .with_state(app);

    apply_standard_layers(router, SERVICE_NAME)
}

async fn healthz(State(app): State<Arc<App>>) -> impl IntoResponse {
    let db = Arc::clone(&app.db);
    let probe = tokio::task::spawn_blocking(move || db.ping())
        .await
        .map_err(BookmarkError::from)
        .and_then(|result| result.map_err(BookmarkError::from));

    match probe {
        Ok(()) => (StatusCode::OK, Json(HealthStatus { status: "ok" })),
        Err(err) => {
            tracing::error!(error = %err, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "unavailable",
                }),
            )
        }
    }
}

pub fn apply_standard_layers(router: Router, service_name: &'static str) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(move |request: &axum::http::Request<_>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http.request",
                service = service_name,
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id
            )
        })
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let request_id_header = HeaderName::from_static("x-request-id");

    router
        .layer(CorsLayer::permissive())
        .layer(trace)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(RequestBodyLimitLayer::new(1024 * 1024))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
}
