//! In-process fake of the ticketing backend.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use metro_tickets::infrastructure::config::ApiConfig;

pub const EMAIL: &str = "a@b.com";
pub const PASSWORD: &str = "Aa1@2345";

#[derive(Default)]
pub struct BackendState {
    pub session_calls: AtomicUsize,
    pub session_delay_ms: AtomicU64,
    pub logout_fails: AtomicBool,
    pub last_cookie: Mutex<Option<String>>,
}

impl BackendState {
    pub fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    pub fn last_cookie(&self) -> Option<String> {
        self.last_cookie.lock().unwrap().clone()
    }

    fn record_cookie(&self, headers: &HeaderMap) -> Option<String> {
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        *self.last_cookie.lock().unwrap() = cookie.clone();
        cookie
    }
}

pub struct FakeBackend {
    pub addr: SocketAddr,
    pub state: Arc<BackendState>,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/auth/logout", post(logout))
            .route("/auth/session", get(session))
            .route("/auth/validate-existing-email", get(validate_email))
            .route("/auth/google-signup-url", get(google_signup_url))
            .route("/auth/google", get(google))
            .route("/stations", get(stations))
            .route("/stations/{id}", get(station))
            .route("/ticket/ticket-types", get(ticket_types))
            .route("/ticket/best-ticket", get(best_ticket))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.url(),
            timeout_secs: 5,
            accept_invalid_certs: false,
        }
    }
}

/// Unsigned token expiring one hour from now.
pub fn session_token() -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp},"roles":"USER","userId":"1"}}"#));
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

fn user() -> Value {
    json!({
        "id": 1,
        "email": EMAIL,
        "roles": ["USER"],
        "name": "Ana",
        "lastName": "Diaz",
        "phone": "5551234"
    })
}

fn error(status: StatusCode, message: Value) -> Response {
    (
        status,
        Json(json!({ "statusCode": status.as_u16(), "message": message })),
    )
        .into_response()
}

fn signed_in() -> Response {
    let token = session_token();
    (
        [(header::SET_COOKIE, format!("user_auth={token}; Path=/; HttpOnly"))],
        Json(json!({ "token": token, "user": user() })),
    )
        .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == EMAIL && body["password"] == PASSWORD {
        signed_in()
    } else {
        error(StatusCode::UNAUTHORIZED, json!("Invalid credentials"))
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@metro.test" {
        return error(StatusCode::CONFLICT, json!("Email already registered"));
    }
    if body["phone"].as_str().is_none_or(str::is_empty) {
        return error(
            StatusCode::BAD_REQUEST,
            json!(["phone must be a valid phone number"]),
        );
    }
    (StatusCode::CREATED, Json(json!({ "id": 2 }))).into_response()
}

async fn logout(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    state.record_cookie(&headers);
    if state.logout_fails.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, json!("logout unavailable"));
    }
    (
        [(header::SET_COOKIE, "user_auth=; Path=/; Max-Age=0")],
        Json(json!({ "ok": true })),
    )
        .into_response()
}

async fn session(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    state.session_calls.fetch_add(1, Ordering::SeqCst);
    let delay = state.session_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let authenticated = state
        .record_cookie(&headers)
        .is_some_and(|cookie| cookie.split(';').any(|pair| {
            pair.trim()
                .strip_prefix("user_auth=")
                .is_some_and(|value| !value.is_empty())
        }));

    if authenticated {
        Json(json!({ "user": user() })).into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, json!("Unauthorized"))
    }
}

async fn validate_email(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let exists = query.get("email").is_some_and(|email| email == EMAIL);
    Json(json!({ "exists": exists }))
}

async fn google_signup_url() -> Json<Value> {
    Json(json!({ "url": "https://accounts.example.test/signup" }))
}

async fn google(Query(query): Query<HashMap<String, String>>) -> Response {
    if query.get("code").is_some_and(|code| code == "valid-code") {
        signed_in()
    } else {
        error(StatusCode::UNAUTHORIZED, json!("Invalid code"))
    }
}

async fn stations() -> Json<Value> {
    Json(json!([
        { "id": 1, "name": "Central", "line": "A" },
        { "id": "2", "name": "Harbor" }
    ]))
}

async fn station(Path(id): Path<String>) -> Response {
    if id == "1" {
        Json(json!({ "id": 1, "name": "Central", "line": "A", "address": "1 Main St" }))
            .into_response()
    } else {
        error(StatusCode::NOT_FOUND, json!("Station not found"))
    }
}

async fn ticket_types() -> Json<Value> {
    Json(json!([
        { "id": "single", "name": "Single ride", "price": "1.50", "trips": 1 },
        { "id": "monthly", "name": "Monthly", "price": 45, "validityDays": 30 }
    ]))
}

async fn best_ticket(Query(query): Query<HashMap<String, String>>) -> Response {
    if query.get("email").is_some_and(|email| email == EMAIL) {
        Json(json!({ "id": "monthly", "name": "Monthly", "price": 45, "validityDays": 30 }))
            .into_response()
    } else {
        error(StatusCode::NOT_FOUND, json!("No recommendation"))
    }
}
