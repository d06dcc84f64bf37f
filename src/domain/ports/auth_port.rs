//! Authentication port definition.

use async_trait::async_trait;

use crate::domain::entities::{SessionToken, User};
use crate::domain::errors::RequestError;
use crate::domain::forms::{LoginForm, RegisterForm};
use crate::domain::session::AuthGrant;

/// Port for backend authentication operations.
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Submits credentials and returns the signed-in user.
    async fn login(&self, form: &LoginForm) -> Result<AuthGrant, RequestError>;

    /// Creates a new account.
    async fn register(&self, form: &RegisterForm) -> Result<(), RequestError>;

    /// Invalidates the server-side session.
    async fn logout(&self) -> Result<(), RequestError>;

    /// Returns the user owning the current session.
    async fn current_session(&self) -> Result<User, RequestError>;

    /// Returns whether an email is free for registration.
    async fn email_available(&self, email: &str) -> Result<bool, RequestError>;

    /// Returns the URL that starts the Google sign-up flow.
    async fn google_signup_url(&self) -> Result<String, RequestError>;

    /// Exchanges a Google authorization code for a session.
    async fn google_login(&self, code: &str) -> Result<AuthGrant, RequestError>;

    /// Returns the locally held session token, if any.
    fn session_token(&self) -> Option<SessionToken> {
        None
    }
}
