//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, lazy_pool, TestApp};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let app = TestApp::start(pool).await;
    let response = get(app.router(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["session_loaded"], true);
}

#[tokio::test]
async fn health_check_reports_degraded_without_database() {
    let app = TestApp::start(lazy_pool()).await;
    let json = body_json(get(app.router(), "/health").await).await;

    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = TestApp::start(lazy_pool()).await;
    let response = get(app.router(), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = TestApp::start(lazy_pool()).await;
    let response = get(app.router(), "/api/v1/session").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36, "x-request-id should be a UUID string");
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = TestApp::start(lazy_pool()).await;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/organizations")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = common::send(app.router(), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:3000"
    );
    assert!(response
        .headers()
        .get("access-control-allow-credentials")
        .is_none());
}
