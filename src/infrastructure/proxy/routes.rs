use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::debug;

use super::ProxyState;
use super::error::ProxyError;
use crate::infrastructure::backend::ForwardRequest;

pub(super) async fn login(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    relay(&state, Method::POST, "/auth/login", None, &headers, body).await
}

pub(super) async fn register(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    relay(&state, Method::POST, "/auth/register", None, &headers, body).await
}

pub(super) async fn logout(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    relay(&state, Method::POST, "/auth/logout", None, &headers, body).await
}

pub(super) async fn validate_existing_email(
    State(state): State<ProxyState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    relay(
        &state,
        Method::GET,
        "/auth/validate-existing-email",
        query,
        &headers,
        Bytes::new(),
    )
    .await
}

pub(super) async fn google_signup_url(
    State(state): State<ProxyState>,
    headers: HeaderMap,
) -> Response {
    relay(
        &state,
        Method::GET,
        "/auth/google-signup-url",
        None,
        &headers,
        Bytes::new(),
    )
    .await
}

pub(super) async fn google(
    State(state): State<ProxyState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    relay(&state, Method::GET, "/auth/google", query, &headers, Bytes::new()).await
}

/// Forwards body, query and `Cookie`; answers with upstream status, body and `Set-Cookie`.
async fn relay(
    state: &ProxyState,
    method: Method,
    path: &str,
    query: Option<String>,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    debug!(%method, path, "Relaying auth request");

    let request = ForwardRequest {
        method,
        path: path.to_string(),
        query,
        cookie: headers.get(header::COOKIE).cloned(),
        body: body.to_vec(),
    };

    let forwarded = match state.upstream.forward(request).await {
        Ok(forwarded) => forwarded,
        Err(e) => return ProxyError::from(e).into_response(),
    };

    let mut response = match StatusCode::from_u16(forwarded.status) {
        Ok(status) if status.is_success() => {
            let mut response = (status, forwarded.body).into_response();
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            response
        }
        _ => ProxyError::from_upstream(forwarded.status, &forwarded.body).into_response(),
    };

    for cookie in forwarded.set_cookies {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}
