mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{CountingStore, app_with_store, get, memory_app, read_body, read_json};
use std::sync::Arc;
use tower::ServiceExt;

fn options(uri: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri(uri)
        .header("origin", "https://ui.example.com")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .expect("request")
}

fn assert_cors_headers(response: &axum::response::Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-headers"],
        "Content-Type, Authorization"
    );
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
}

#[tokio::test]
async fn preflight_is_answered_without_reaching_handlers() {
    for uri in ["/api/tenants", "/api/shifts", "/api/does-not-exist"] {
        let store = Arc::new(CountingStore::default());
        let response = app_with_store(store.clone())
            .oneshot(options(uri))
            .await
            .expect("preflight");
        assert_eq!(response.status(), StatusCode::NO_CONTENT, "{uri}");
        assert_cors_headers(&response);
        assert!(read_body(response).await.is_empty());
        assert_eq!(store.calls(), 0);
    }
}

#[tokio::test]
async fn api_responses_carry_cors_headers() {
    let response = memory_app().oneshot(get("/api/tenants")).await.expect("list");
    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);
}

#[tokio::test]
async fn api_errors_carry_cors_headers() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/tenants")
        .body(Body::from("{"))
        .expect("request");
    let response = memory_app().oneshot(request).await.expect("create");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_cors_headers(&response);
}

#[tokio::test]
async fn unknown_api_path_is_404_with_cors_headers() {
    let response = memory_app()
        .oneshot(get("/api/nowhere"))
        .await
        .expect("missing");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_cors_headers(&response);
    assert_eq!(read_json(response).await["error"], "not found");
}

#[tokio::test]
async fn unsupported_method_is_rejected_with_cors_headers() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/tenants")
        .body(Body::empty())
        .expect("request");
    let response = memory_app().oneshot(request).await.expect("delete");
    assert!(response.status().is_client_error());
    assert_cors_headers(&response);
}

#[tokio::test]
async fn non_api_paths_have_no_cors_headers() {
    let response = memory_app().oneshot(options("/healthz")).await.expect("options");
    assert_ne!(response.status(), StatusCode::NO_CONTENT);
    assert!(
        response
            .headers()
            .get("access-control-allow-origin")
            .is_none()
    );
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let response = memory_app()
        .oneshot(get("/api/openapi.json"))
        .await
        .expect("openapi");
    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);
    let doc = read_json(response).await;
    assert_eq!(doc["info"]["title"], "shiftboard");
    for path in ["/api/tenants", "/api/shifts", "/healthz", "/readyz"] {
        assert!(doc["paths"].get(path).is_some(), "{path}");
    }
    assert!(doc["components"]["schemas"].get("Shift").is_some());
}
