//! Backend authentication adapter.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::client::{ApiClient, RequestOptions};
use super::dto::{EmailCheckDto, LoginResponseDto, SessionPayload, SignupUrlDto};
use crate::domain::entities::{SessionToken, User};
use crate::domain::errors::RequestError;
use crate::domain::forms::{LoginForm, RegisterForm};
use crate::domain::ports::AuthPort;
use crate::domain::session::AuthGrant;

const LOGIN: &str = "/auth/login";
const REGISTER: &str = "/auth/register";
const LOGOUT: &str = "/auth/logout";
const SESSION: &str = "/auth/session";
const VALIDATE_EMAIL: &str = "/auth/validate-existing-email";
const GOOGLE_SIGNUP_URL: &str = "/auth/google-signup-url";
const GOOGLE: &str = "/auth/google";

/// `AuthPort` over the backend `/auth` endpoints.
pub struct BackendAuthClient {
    api: Arc<ApiClient>,
}

impl BackendAuthClient {
    #[must_use]
    pub const fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Installs the body token, if any, and returns the grant.
    fn grant(&self, response: LoginResponseDto) -> AuthGrant {
        let token = response.token.and_then(SessionToken::new);
        if let Some(token) = &token {
            self.api.install_session_token(token);
        }
        let token = token.or_else(|| self.api.session_token());
        if token.is_none() {
            debug!("Backend issued no session token");
        }
        AuthGrant::new(response.user, token)
    }
}

#[async_trait]
impl AuthPort for BackendAuthClient {
    async fn login(&self, form: &LoginForm) -> Result<AuthGrant, RequestError> {
        let response = self
            .api
            .post::<_, LoginResponseDto>(LOGIN, form, &RequestOptions::new())
            .await?;
        Ok(self.grant(response.data))
    }

    async fn register(&self, form: &RegisterForm) -> Result<(), RequestError> {
        self.api
            .post::<_, Value>(REGISTER, form, &RequestOptions::new())
            .await
            .map(|_| ())
    }

    async fn logout(&self) -> Result<(), RequestError> {
        let result = self
            .api
            .post::<_, Value>(LOGOUT, &serde_json::json!({}), &RequestOptions::new())
            .await;
        self.api.clear_session_token();

        result.map(|_| ()).inspect_err(|e| {
            warn!(error = %e, "Backend logout failed");
        })
    }

    async fn current_session(&self) -> Result<User, RequestError> {
        let response = self
            .api
            .get::<SessionPayload>(SESSION, &RequestOptions::new())
            .await?;
        Ok(response.data.into_user())
    }

    async fn email_available(&self, email: &str) -> Result<bool, RequestError> {
        let options = RequestOptions::new().query("email", email);
        let response = self
            .api
            .get::<EmailCheckDto>(VALIDATE_EMAIL, &options)
            .await?;
        Ok(response.data.is_available())
    }

    async fn google_signup_url(&self) -> Result<String, RequestError> {
        let response = self
            .api
            .get::<SignupUrlDto>(GOOGLE_SIGNUP_URL, &RequestOptions::new())
            .await?;
        Ok(response.data.into_url())
    }

    async fn google_login(&self, code: &str) -> Result<AuthGrant, RequestError> {
        let options = RequestOptions::new().query("code", code);
        let response = self.api.get::<LoginResponseDto>(GOOGLE, &options).await?;
        Ok(self.grant(response.data))
    }

    fn session_token(&self) -> Option<SessionToken> {
        self.api.session_token()
    }
}
