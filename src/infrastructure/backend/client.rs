//! Backend HTTP client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{self, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::ErrorBody;
use crate::domain::entities::{SESSION_COOKIE, SessionToken};
use crate::domain::errors::RequestError;
use crate::infrastructure::config::{ApiConfig, AppConfig};

const USER_AGENT: &str = concat!("metro-tickets/", env!("CARGO_PKG_VERSION"));

/// Per-request knobs.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    query: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Overrides the client-wide timeout for this request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Successful response with its parsed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
}

/// Request relayed verbatim to the backend.
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub cookie: Option<HeaderValue>,
    pub body: Vec<u8>,
}

/// Backend answer to a relayed request, whatever its status.
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub set_cookies: Vec<HeaderValue>,
}

/// HTTP client bound to one backend origin.
///
/// Every failure is returned to the caller as is. Nothing is retried.
pub struct ApiClient {
    client: Client,
    origin: Url,
    jar: Option<Arc<Jar>>,
}

impl ApiClient {
    /// Creates client carrying the session cookie on every request.
    ///
    /// # Errors
    /// Returns error if the origin is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn new(config: &ApiConfig, relaxed_tls: bool) -> Result<Self, RequestError> {
        Self::build(config, relaxed_tls, Some(Arc::new(Jar::default())))
    }

    /// Creates client without a cookie store, for relaying other clients' requests.
    ///
    /// # Errors
    /// Returns error if the origin is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn without_cookies(config: &ApiConfig, relaxed_tls: bool) -> Result<Self, RequestError> {
        Self::build(config, relaxed_tls, None)
    }

    /// Creates cookie-carrying client from application config.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, RequestError> {
        Self::new(&config.api, config.relaxed_tls())
    }

    fn build(
        config: &ApiConfig,
        relaxed_tls: bool,
        jar: Option<Arc<Jar>>,
    ) -> Result<Self, RequestError> {
        let origin = Url::parse(config.base_url.trim_end_matches('/')).map_err(|e| {
            RequestError::unexpected(format!("invalid backend url {}: {e}", config.base_url))
        })?;

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout());

        if let Some(jar) = &jar {
            builder = builder.cookie_provider(jar.clone());
        }
        if relaxed_tls {
            warn!(origin = %origin, "Certificate verification disabled for development backend");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| RequestError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            origin,
            jar,
        })
    }

    #[must_use]
    pub const fn origin(&self) -> &Url {
        &self.origin
    }

    fn url(&self, path: &str) -> Result<Url, RequestError> {
        let base = self.origin.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|e| RequestError::invalid(format!("invalid request path {path}: {e}")))
    }

    /// Issues a GET and parses the JSON body.
    ///
    /// # Errors
    /// Returns the classified failure.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<T>, RequestError> {
        let request = self.client.get(self.url(path)?);
        self.execute(path, request, options).await
    }

    /// Issues a POST with a JSON body and parses the JSON response.
    ///
    /// # Errors
    /// Returns the classified failure.
    pub async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
        options: &RequestOptions,
    ) -> Result<ApiResponse<T>, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)?).json(body);
        self.execute(path, request, options).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        mut request: RequestBuilder,
        options: &RequestOptions,
    ) -> Result<ApiResponse<T>, RequestError> {
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        debug!(path, "Sending backend request");
        let response = request.send().await.map_err(|e| {
            warn!(path, error = %e, "Backend request failed");
            transport_error(&e)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| transport_error(&e))?;
        debug!(path, status = status.as_u16(), "Backend responded");

        if !status.is_success() {
            return Err(ErrorBody::parse(&body).into_error(status.as_u16(), status.canonical_reason()));
        }

        let data = parse_body(&body).map_err(|e| {
            warn!(path, error = %e, "Unexpected response body");
            e
        })?;

        Ok(ApiResponse {
            status: status.as_u16(),
            data,
        })
    }

    /// Relays a request and returns the backend answer unclassified.
    ///
    /// # Errors
    /// Returns a network error when the backend cannot be reached.
    pub async fn forward(&self, request: ForwardRequest) -> Result<ForwardedResponse, RequestError> {
        let mut url = self.url(&request.path)?;
        url.set_query(request.query.as_deref().filter(|q| !q.is_empty()));

        let mut builder = self.client.request(request.method, url);
        if let Some(cookie) = request.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if !request.body.is_empty() {
            builder = builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(request.body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(path = %request.path, error = %e, "Relayed request failed");
            transport_error(&e)
        })?;

        read_forwarded(response).await
    }

    /// Returns the session token held in the cookie jar.
    #[must_use]
    pub fn session_token(&self) -> Option<SessionToken> {
        let header = self.jar.as_ref()?.cookies(&self.origin)?;
        let cookies = header.to_str().ok()?;

        cookies
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| SessionToken::new(value))
    }

    /// Stores a token returned in a response body as the session cookie.
    pub fn install_session_token(&self, token: &SessionToken) {
        if let Some(jar) = &self.jar {
            jar.add_cookie_str(
                &format!("{SESSION_COOKIE}={}; Path=/", token.as_str()),
                &self.origin,
            );
        }
    }

    /// Expires the session cookie.
    pub fn clear_session_token(&self) {
        if let Some(jar) = &self.jar {
            jar.add_cookie_str(&format!("{SESSION_COOKIE}=; Path=/; Max-Age=0"), &self.origin);
        }
    }
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, RequestError> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        body
    };

    serde_json::from_slice(body).map_err(|e| RequestError::malformed(e.to_string()))
}

async fn read_forwarded(response: Response) -> Result<ForwardedResponse, RequestError> {
    let status = response.status().as_u16();
    let set_cookies = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .cloned()
        .collect();
    let body = response.bytes().await.map_err(|e| transport_error(&e))?;

    Ok(ForwardedResponse {
        status,
        body: body.to_vec(),
        set_cookies,
    })
}

fn transport_error(e: &reqwest::Error) -> RequestError {
    if e.is_timeout() {
        RequestError::network("request timed out")
    } else if e.is_connect() {
        RequestError::network("failed to connect to backend")
    } else if e.is_decode() {
        RequestError::malformed(e.to_string())
    } else {
        RequestError::network(e.to_string())
    }
}
