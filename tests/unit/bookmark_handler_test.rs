//! HTTP-level tests for the bookmark routes.
//!
//! Every request goes through the full router (layers included) via
//! `tower::ServiceExt::oneshot`, backed by an in-memory SQLite database.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use bookmarks_api::app::App;
use bookmarks_api::bookmark_handler::{item_location, with_bookmarks};
use bookmarks_api::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use bookmarks_api::router::build_router;
use bookmarks_api::types::bookmark::{NewBookmark, SerializedBookmark};

fn setup() -> (Arc<App>, Router) {
    let app = Arc::new(App::in_memory(None).expect("Failed to init App"));
    let router = build_router(app.clone());
    (app, router)
}

fn test_bookmarks() -> Vec<NewBookmark> {
    vec![
        NewBookmark {
            title: "Thinkful".to_string(),
            url: "https://www.thinkful.com".to_string(),
            rating: 5,
            description: "Think outside the classroom".to_string(),
        },
        NewBookmark {
            title: "Google".to_string(),
            url: "https://www.google.com".to_string(),
            rating: 4,
            description: "Where we find everything else".to_string(),
        },
        NewBookmark {
            title: "MDN".to_string(),
            url: "https://developer.mozilla.org".to_string(),
            rating: 5,
            description: "The only place to find web documentation".to_string(),
        },
    ]
}

/// Inserts the fixture bookmarks and returns them as JSON in id order.
fn seed(app: &App) -> Vec<Value> {
    let conn = app.db.connection();
    let mut mgr = BookmarkManager::new(&conn);
    test_bookmarks()
        .iter()
        .map(|draft| {
            let b = mgr.insert_bookmark(draft).expect("seed insert");
            json!({
                "id": b.id,
                "title": b.title,
                "url": b.url,
                "rating": b.rating,
                "description": b.description,
            })
        })
        .collect()
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("response body should be JSON")
}

fn not_found() -> Value {
    json!({"error": {"message": "Bookmark Not Found"}})
}

// ─── GET /api/bookmark ───

#[tokio::test]
async fn test_list_empty_returns_empty_array() {
    let (_app, router) = setup();
    let (status, _, body) = send(&router, Method::GET, "/api/bookmark", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!([]));
}

#[tokio::test]
async fn test_list_returns_all_bookmarks() {
    let (app, router) = setup();
    let expected = seed(&app);
    let (status, _, body) = send(&router, Method::GET, "/api/bookmark", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), Value::Array(expected));
}

// ─── GET /api/bookmark/:id ───

#[tokio::test]
async fn test_get_unknown_id_returns_404() {
    let (_app, router) = setup();
    let (status, _, body) = send(&router, Method::GET, "/api/bookmark/123432", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body), not_found());
}

#[tokio::test]
async fn test_get_non_numeric_id_returns_404() {
    let (_app, router) = setup();
    let (status, _, body) = send(&router, Method::GET, "/api/bookmark/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body), not_found());
}

#[tokio::test]
async fn test_get_returns_specified_bookmark() {
    let (app, router) = setup();
    let expected = seed(&app);
    let id = expected[0]["id"].as_i64().unwrap();
    let (status, _, body) = send(&router, Method::GET, &format!("/api/bookmark/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), expected[0]);
}

// ─── POST /api/bookmark ───

#[tokio::test]
async fn test_create_missing_title_returns_404() {
    let (_app, router) = setup();
    let (status, _, body) = send(&router, Method::POST, "/api/bookmark", Some(json!({
        "url": "https://newbookmark.com",
        "description": "This is a new test bookmark",
        "rating": 3,
    }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body), json!({"error": {"message": "A title is required"}}));
}

#[tokio::test]
async fn test_create_bad_url_returns_404() {
    let (_app, router) = setup();
    let (status, _, body) = send(&router, Method::POST, "/api/bookmark", Some(json!({
        "title": "New test bookmark",
        "url": "newbookmark.com",
        "description": "This is a new test bookmark",
        "rating": 3,
    }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body), json!({"error": {"message": "A valid url is required"}}));
}

#[tokio::test]
async fn test_create_bad_rating_returns_404() {
    let (_app, router) = setup();
    let (status, _, body) = send(&router, Method::POST, "/api/bookmark", Some(json!({
        "title": "New test bookmark",
        "url": "https://newbookmark.com",
        "description": "This is a new test bookmark",
        "rating": 10,
    }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(&body),
        json!({"error": {"message": "A rating between 1 and 5 is required"}})
    );
}

#[tokio::test]
async fn test_create_without_body_reports_title_first() {
    let (app, router) = setup();
    let (status, _, body) = send(&router, Method::POST, "/api/bookmark", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body), json!({"error": {"message": "A title is required"}}));

    let conn = app.db.connection();
    assert!(BookmarkManager::new(&conn).list_bookmarks().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_responds_201_with_location_and_record() {
    let (_app, router) = setup();
    let new_bookmark = json!({
        "title": "New test bookmark",
        "url": "https://newbookmark.com",
        "description": "This is a new test bookmark",
        "rating": 3,
    });
    let (status, headers, body) =
        send(&router, Method::POST, "/api/bookmark", Some(new_bookmark.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let created: SerializedBookmark = serde_json::from_slice(&body).expect("bookmark body");
    let id = created.id;
    assert_eq!(
        created,
        SerializedBookmark {
            id,
            title: "New test bookmark".to_string(),
            url: "https://newbookmark.com".to_string(),
            rating: 3,
            description: "This is a new test bookmark".to_string(),
        }
    );

    let location = headers
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(location, format!("/api/bookmark/{}", id));

    let (status, _, body) = send(&router, Method::GET, &location, None).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: SerializedBookmark = serde_json::from_slice(&body).expect("bookmark body");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_accepts_string_rating() {
    let (_app, router) = setup();
    let (status, _, body) = send(&router, Method::POST, "/api/bookmark", Some(json!({
        "title": "T", "url": "http://t.com", "rating": "2"
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json_body(&body)["rating"], json!(2));
}

#[tokio::test]
async fn test_create_assigns_unique_ids() {
    let (_app, router) = setup();
    let payload = json!({"title": "T", "url": "https://t.com", "rating": 1});
    let (_, _, a) = send(&router, Method::POST, "/api/bookmark", Some(payload.clone())).await;
    let (_, _, b) = send(&router, Method::POST, "/api/bookmark", Some(payload)).await;
    assert_ne!(json_body(&a)["id"], json_body(&b)["id"]);
}

#[tokio::test]
async fn test_create_ignores_client_supplied_id() {
    let (_app, router) = setup();
    let (status, _, body) = send(&router, Method::POST, "/api/bookmark", Some(json!({
        "id": 911, "title": "T", "url": "https://t.com", "rating": 1
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(json_body(&body)["id"], json!(911));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_creates_all_land() {
    let (_app, router) = setup();

    let mut handles = Vec::new();
    for n in 0..16 {
        let router = router.clone();
        handles.push(tokio::spawn(async move {
            let payload = json!({"title": format!("T{}", n), "url": "https://t.com", "rating": 1 + n % 5});
            send(&router, Method::POST, "/api/bookmark", Some(payload)).await.0
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }

    let (_, _, body) = send(&router, Method::GET, "/api/bookmark", None).await;
    let listed: Vec<SerializedBookmark> = serde_json::from_slice(&body).expect("list body");
    assert_eq!(listed.len(), 16);
}

#[tokio::test]
async fn test_with_bookmarks_runs_manager_calls() {
    let (app, _router) = setup();
    seed(&app);

    let count = with_bookmarks(&app, |manager| manager.list_bookmarks().map(|all| all.len()))
        .await
        .unwrap();
    assert_eq!(count, 3);
}

// ─── DELETE /api/bookmark/:id ───

#[tokio::test]
async fn test_delete_unknown_id_returns_404() {
    let (_app, router) = setup();
    let (status, _, body) = send(&router, Method::DELETE, "/api/bookmark/123432", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body), not_found());
}

#[tokio::test]
async fn test_delete_removes_bookmark() {
    let (app, router) = setup();
    let seeded = seed(&app);
    let id = seeded[1]["id"].as_i64().unwrap();

    let (status, _, body) = send(&router, Method::DELETE, &format!("/api/bookmark/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let expected: Vec<Value> = seeded.into_iter().filter(|b| b["id"] != json!(id)).collect();
    let (_, _, body) = send(&router, Method::GET, "/api/bookmark", None).await;
    assert_eq!(json_body(&body), Value::Array(expected));
}

#[tokio::test]
async fn test_delete_twice_returns_404_second_time() {
    let (app, router) = setup();
    let seeded = seed(&app);
    let uri = format!("/api/bookmark/{}", seeded[0]["id"]);

    let (first, _, _) = send(&router, Method::DELETE, &uri, None).await;
    let (second, _, body) = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(first, StatusCode::NO_CONTENT);
    assert_eq!(second, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body), not_found());
}

// ─── PATCH /api/bookmark/:id ───

#[tokio::test]
async fn test_patch_unknown_id_returns_404() {
    let (_app, router) = setup();
    let (status, _, body) = send(&router, Method::PATCH, "/api/bookmark/1423554", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body), not_found());
}

#[tokio::test]
async fn test_patch_updates_fields_and_returns_204() {
    let (app, router) = setup();
    let seeded = seed(&app);
    let uri = format!("/api/bookmark/{}", seeded[1]["id"]);
    let updates = json!({"title": "the title has been updated", "rating": 2});

    let (status, _, body) = send(&router, Method::PATCH, &uri, Some(updates)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let mut expected = seeded[1].clone();
    expected["title"] = json!("the title has been updated");
    expected["rating"] = json!(2);
    let (_, _, body) = send(&router, Method::GET, &uri, None).await;
    assert_eq!(json_body(&body), expected);
}

#[tokio::test]
async fn test_patch_ignores_unknown_fields() {
    let (app, router) = setup();
    let seeded = seed(&app);
    let uri = format!("/api/bookmark/{}", seeded[1]["id"]);

    let (status, _, _) = send(&router, Method::PATCH, &uri, Some(json!({
        "title": "the title has been updated",
        "rating": 2,
        "fieldToIgnore": "should not be in GET response",
    }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, _, body) = send(&router, Method::GET, &uri, None).await;
    let got = json_body(&body);
    assert!(got.get("fieldToIgnore").is_none());
    assert_eq!(got["title"], json!("the title has been updated"));
    assert_eq!(got["url"], seeded[1]["url"]);
    assert_eq!(got["description"], seeded[1]["description"]);
}

#[tokio::test]
async fn test_patch_empty_body_returns_400_and_leaves_storage() {
    let (app, router) = setup();
    let seeded = seed(&app);
    let uri = format!("/api/bookmark/{}", seeded[1]["id"]);

    let (status, _, body) = send(&router, Method::PATCH, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(&body),
        json!({"error": {"message": "Request body must contain either 'title', 'url', 'rating', or 'description'"}})
    );

    let (_, _, body) = send(&router, Method::GET, &uri, None).await;
    assert_eq!(json_body(&body), seeded[1]);
}

#[tokio::test]
async fn test_patch_only_unknown_fields_returns_400() {
    let (app, router) = setup();
    let seeded = seed(&app);
    let uri = format!("/api/bookmark/{}", seeded[0]["id"]);

    let (status, _, _) = send(&router, Method::PATCH, &uri, Some(json!({"foo": "bar"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_with_only_falsy_values_returns_400() {
    let (app, router) = setup();
    let seeded = seed(&app);
    let uri = format!("/api/bookmark/{}", seeded[2]["id"]);

    for payload in [
        json!({"description": ""}),
        json!({"title": ""}),
        json!({"rating": 0}),
        json!({"title": "", "url": "", "rating": 0, "description": null}),
    ] {
        let (status, _, body) = send(&router, Method::PATCH, &uri, Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
        assert_eq!(
            json_body(&body),
            json!({"error": {"message": "Request body must contain either 'title', 'url', 'rating', or 'description'"}})
        );
    }

    let (_, _, body) = send(&router, Method::GET, &uri, None).await;
    assert_eq!(json_body(&body), seeded[2]);
}

#[tokio::test]
async fn test_patch_skips_falsy_values_beside_real_ones() {
    let (app, router) = setup();
    let seeded = seed(&app);
    let uri = format!("/api/bookmark/{}", seeded[0]["id"]);

    let (status, _, _) = send(&router, Method::PATCH, &uri, Some(json!({
        "description": "",
        "rating": 2,
    }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, _, body) = send(&router, Method::GET, &uri, None).await;
    let got = json_body(&body);
    assert_eq!(got["rating"], json!(2));
    assert_eq!(got["description"], seeded[0]["description"]);
}

#[tokio::test]
async fn test_patch_invalid_rating_is_rejected() {
    let (app, router) = setup();
    let seeded = seed(&app);
    let uri = format!("/api/bookmark/{}", seeded[0]["id"]);

    let (status, _, body) = send(&router, Method::PATCH, &uri, Some(json!({"rating": 9}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(&body),
        json!({"error": {"message": "A rating between 1 and 5 is required"}})
    );

    let (_, _, body) = send(&router, Method::GET, &uri, None).await;
    assert_eq!(json_body(&body), seeded[0]);
}

#[tokio::test]
async fn test_patch_with_unchanged_values_still_204() {
    let (app, router) = setup();
    let seeded = seed(&app);
    let uri = format!("/api/bookmark/{}", seeded[0]["id"]);

    let (status, _, _) = send(&router, Method::PATCH, &uri, Some(json!({"title": seeded[0]["title"].clone()}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// ─── Misc ───

#[tokio::test]
async fn test_responses_carry_request_id() {
    let (_app, router) = setup();
    let (_, headers, _) = send(&router, Method::GET, "/api/bookmark", None).await;
    assert!(headers.get("x-request-id").is_some());
}

#[tokio::test]
async fn test_healthz_reports_ok() {
    let (_app, router) = setup();
    let (status, _, body) = send(&router, Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({"status": "ok"}));
}

#[tokio::test]
async fn test_healthz_reports_unavailable_when_storage_is_broken() {
    let (app, router) = setup();
    app.db
        .connection()
        .execute_batch("DROP TABLE bookmarks;")
        .unwrap();

    let (status, _, body) = send(&router, Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(&body), json!({"status": "unavailable"}));
}

#[test]
fn test_item_location_joins_paths() {
    assert_eq!(item_location("/api/bookmark", 5), "/api/bookmark/5");
    assert_eq!(item_location("/api/bookmark/", 5), "/api/bookmark/5");
}
