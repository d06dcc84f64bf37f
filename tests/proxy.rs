mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use common::{EMAIL, FakeBackend, PASSWORD};
use metro_tickets::infrastructure::config::ApiConfig;
use metro_tickets::infrastructure::proxy::{self, ProxyState};
use metro_tickets::infrastructure::ApiClient;
use serde_json::{Value, json};
use tower::ServiceExt;

fn proxy_for(config: &ApiConfig) -> Router {
    let upstream = ApiClient::without_cookies(config, false).unwrap();
    proxy::router(ProxyState::new(Arc::new(upstream)))
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_login_relays_body_and_cookie() {
    let backend = FakeBackend::spawn().await;
    let app = proxy_for(&backend.api_config());

    let response = app
        .oneshot(post_json(
            "/api/auth/login",
            &json!({ "email": EMAIL, "password": PASSWORD }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("user_auth="));

    let body = json_body(response).await;
    assert_eq!(body["user"]["email"], EMAIL);
}

#[tokio::test]
async fn test_rejected_login_keeps_upstream_status() {
    let backend = FakeBackend::spawn().await;
    let app = proxy_for(&backend.api_config());

    let response = app
        .oneshot(post_json(
            "/api/auth/login",
            &json!({ "email": EMAIL, "password": "nope" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await, json!({ "error": "Invalid credentials" }));
}

#[tokio::test]
async fn test_field_messages_joined_into_error() {
    let backend = FakeBackend::spawn().await;
    let app = proxy_for(&backend.api_config());

    let response = app
        .oneshot(post_json(
            "/api/auth/register",
            &json!({ "email": "new@metro.test", "phone": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "phone must be a valid phone number"
    );
}

#[tokio::test]
async fn test_logout_forwards_caller_cookie() {
    let backend = FakeBackend::spawn().await;
    let app = proxy_for(&backend.api_config());

    let request = Request::post("/api/auth/logout")
        .header(header::COOKIE, "user_auth=caller-token")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        backend.state.last_cookie().as_deref(),
        Some("user_auth=caller-token")
    );
    assert!(
        response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("Max-Age=0")
    );
}

#[tokio::test]
async fn test_query_is_forwarded() {
    let backend = FakeBackend::spawn().await;
    let app = proxy_for(&backend.api_config());

    let request = Request::get("/api/auth/validate-existing-email?email=a%40b.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "exists": true }));
}

#[tokio::test]
async fn test_unreachable_upstream_is_500() {
    let config = ApiConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 2,
        accept_invalid_certs: false,
    };
    let app = proxy_for(&config);

    let request = Request::get("/api/auth/google-signup-url")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json_body(response).await["error"].is_string());
}
