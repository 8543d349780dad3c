//! HTTP API tests, run in-process against the router

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use campus_content::{ContentStore, ContentType, ContentWrite, MemoryStore};
use campus_server::{router, ApiState, Config};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const TOKEN: &str = "let-me-edit";

fn app_with(store: Arc<MemoryStore>, token: Option<&str>) -> Router {
    let config = Config {
        editor_token: token.map(str::to_string),
        media_page_size: 2,
        ..Config::default()
    };
    router(Arc::new(ApiState::new(store.clone(), store, &config).unwrap()))
}

fn app() -> (Arc<MemoryStore>, Router) {
    let store = Arc::new(MemoryStore::new());
    (store.clone(), app_with(store, Some(TOKEN)))
}

fn request(method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_status() {
    let (_store, app) = app();
    let (status, body) = send(&app, request(Method::GET, "/api/v1/status", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["editingEnabled"], true);
}

#[tokio::test]
async fn test_put_then_get_upserts() {
    let (_store, app) = app();
    let uri = "/api/v1/content/home.hero.title";

    let (status, first) = send(
        &app,
        request(
            Method::PUT,
            uri,
            Some(json!({ "content": "Welcome", "type": "text", "page": "home" })),
            Some(TOKEN),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], "home.hero.title");

    let (_, second) = send(
        &app,
        request(
            Method::PUT,
            uri,
            Some(json!({ "content": "Welcome back", "type": "text", "page": "home" })),
            Some(TOKEN),
        ),
    )
    .await;
    assert_eq!(second["recordId"], first["recordId"]);
    assert_eq!(second["createdAt"], first["createdAt"]);

    let (status, read) = send(&app, request(Method::GET, uri, None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["content"], "Welcome back");
    assert_eq!(read["type"], "text");
}

#[tokio::test]
async fn test_missing_content_is_404() {
    let (_store, app) = app();
    let (status, body) = send(&app, request(Method::GET, "/api/v1/content/nope", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_writes_require_token() {
    let (store, app) = app();
    let body = json!({ "content": "x", "type": "text", "page": "home" });

    let (status, _) = send(
        &app,
        request(Method::PUT, "/api/v1/content/home.hero.title", Some(body.clone()), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        request(Method::PUT, "/api/v1/content/home.hero.title", Some(body), Some("wrong")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_writes_rejected_without_configured_token() {
    let store = Arc::new(MemoryStore::new());
    let app = app_with(store.clone(), None);
    let (status, _) = send(
        &app,
        request(
            Method::PUT,
            "/api/v1/content/home.hero.title",
            Some(json!({ "content": "x", "type": "text", "page": "home" })),
            Some(TOKEN),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_patch_keeps_other_fields() {
    let (store, app) = app();
    store
        .write(ContentWrite::new("home.hero.image", "/hero.jpg", ContentType::Image, "home").with_alt("Campus"))
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        request(
            Method::PATCH,
            "/api/v1/content/home.hero.image",
            Some(json!({ "alt": "Front lawn" })),
            Some(TOKEN),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "/hero.jpg");
    assert_eq!(body["alt"], "Front lawn");

    let (status, _) = send(
        &app,
        request(Method::PATCH, "/api/v1/content/missing", Some(json!({ "alt": "x" })), Some(TOKEN)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        request(Method::PATCH, "/api/v1/content/home.hero.image", Some(json!({})), Some(TOKEN)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_page() {
    let (store, app) = app();
    for (id, page) in [("about.mission.body", "about"), ("about.mission.heading", "about"), ("home.hero.title", "home")] {
        store
            .write(ContentWrite::new(id, "x", ContentType::Text, page))
            .await
            .unwrap();
    }

    let (status, body) = send(&app, request(Method::GET, "/api/v1/content?page=about", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body.as_array().unwrap().iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["about.mission.body", "about.mission.heading"]);

    let (status, _) = send(&app, request(Method::GET, "/api/v1/content", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_registry() {
    let (_store, app) = app();
    let (status, pages) = send(&app, request(Method::GET, "/api/v1/registry", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pages.as_array().unwrap().len(), 4);

    let (status, contact) = send(&app, request(Method::GET, "/api/v1/registry/contact", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(contact["sections"][0]["items"][0]["id"], "contact.details.address");

    let (status, _) = send(&app, request(Method::GET, "/api/v1/registry/alumni", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_media_listing_is_capped_and_newest_first() {
    let (_store, app) = app();
    for name in ["a", "b", "c"] {
        let (status, _) = send(
            &app,
            request(
                Method::POST,
                "/api/v1/media",
                Some(json!({
                    "url": format!("https://cdn.school.example/{}.jpg", name),
                    "provider": "cdn",
                    "type": "image",
                    "tags": ["campus"]
                })),
                Some(TOKEN),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, request(Method::GET, "/api/v1/media?limit=10", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    let urls: Vec<_> = body.as_array().unwrap().iter().map(|m| m["url"].as_str().unwrap()).collect();
    assert_eq!(urls, ["https://cdn.school.example/c.jpg", "https://cdn.school.example/b.jpg"]);

    let (_, none) = send(&app, request(Method::GET, "/api/v1/media?tag=sports", None, None)).await;
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_geocode_requires_an_address() {
    let (_store, app) = app();
    let (status, body) = send(&app, request(Method::GET, "/api/v1/geocode", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Address is empty");
}
