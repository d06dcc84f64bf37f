//! Local HTTP proxy exposing the backend auth endpoints under `/api/auth`.

mod error;
mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::domain::errors::RequestError;
use crate::infrastructure::backend::ApiClient;
use crate::infrastructure::config::AppConfig;

pub use error::ProxyError;

/// Shared handler state.
#[derive(Clone)]
pub struct ProxyState {
    upstream: Arc<ApiClient>,
}

impl ProxyState {
    /// Wraps a client. It must not keep a cookie store: cookies belong to
    /// the callers being relayed.
    #[must_use]
    pub const fn new(upstream: Arc<ApiClient>) -> Self {
        Self { upstream }
    }

    /// Builds the state from application config.
    ///
    /// # Errors
    /// Returns error if the upstream client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, RequestError> {
        let upstream = ApiClient::without_cookies(&config.api, config.relaxed_tls())?;
        Ok(Self::new(Arc::new(upstream)))
    }
}

/// Builds the proxy router.
pub fn router(state: ProxyState) -> Router {
    let auth = Router::new()
        .route("/login", post(routes::login))
        .route("/register", post(routes::register))
        .route("/logout", post(routes::logout))
        .route(
            "/validate-existing-email",
            get(routes::validate_existing_email),
        )
        .route("/google-signup-url", get(routes::google_signup_url))
        .route("/google", get(routes::google));

    Router::new()
        .nest("/api/auth", auth)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the proxy until `shutdown` resolves.
///
/// # Errors
/// Returns error if the address cannot be bound or the server fails.
pub async fn serve(
    bind: SocketAddr,
    state: ProxyState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "Auth proxy listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
