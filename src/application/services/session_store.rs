//! Session store: current user, loading flag and the operations that change them.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::domain::entities::{SessionToken, User};
use crate::domain::errors::RequestError;
use crate::domain::forms::{LoginForm, RegisterForm};
use crate::domain::ports::AuthPort;
use crate::domain::session::{AuthGrant, SessionState};

/// Holds the client-side session and coordinates auth requests.
///
/// Every operation takes a generation number when it starts. Its result is
/// applied only while that generation is still the newest, so a slow request
/// can never overwrite the outcome of an operation that started after it.
pub struct SessionStore {
    auth: Arc<dyn AuthPort>,
    state: watch::Sender<SessionState>,
    generation: AtomicU64,
    check_lock: Mutex<()>,
}

impl SessionStore {
    /// Creates store in the initial `{None, loading}` state.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthPort>) -> Self {
        let (state, _) = watch::channel(SessionState::initial());
        Self {
            auth,
            state,
            generation: AtomicU64::new(0),
            check_lock: Mutex::new(()),
        }
    }

    /// Returns a receiver notified on every observable change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().current_user.clone()
    }

    /// Returns the locally held session token.
    #[must_use]
    pub fn session_token(&self) -> Option<SessionToken> {
        self.auth.session_token()
    }

    /// Re-validates the session against the backend.
    ///
    /// Never fails: any error leaves the session logged out. Returns once
    /// `is_loading` is false. A call made while another check is running
    /// joins that check instead of issuing a second request.
    pub async fn check_auth(&self) -> SessionState {
        let Ok(_guard) = self.check_lock.try_lock() else {
            debug!("Session check already in flight, joining it");
            drop(self.check_lock.lock().await);
            return self.settled().await;
        };

        let generation = self.begin(false);
        let user = self.fetch_session().await;

        if !self.finish(generation, user) {
            debug!(generation, "Discarding superseded session check");
        }

        self.settled().await
    }

    async fn fetch_session(&self) -> Option<User> {
        if let Some(token) = self.auth.session_token()
            && token.is_expired()
        {
            info!(token = %token, "Local session token expired, skipping session check");
            return None;
        }

        match self.auth.current_session().await {
            Ok(user) => {
                info!(user_id = %user.id(), "Session restored");
                Some(user)
            }
            Err(e) if e.is_auth_error() => {
                debug!(error = %e, "No valid session");
                None
            }
            Err(e) => {
                warn!(error = %e, "Session check failed");
                None
            }
        }
    }

    /// Signs in with email and password.
    ///
    /// # Errors
    /// Returns a validation error when the form is rejected locally, the
    /// classified backend error otherwise. The session is logged out on
    /// any failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, RequestError> {
        let form = LoginForm::new(email, password);

        if let Err(errors) = form.validate() {
            let error = RequestError::from(errors);
            debug!(error = %error, "Login form rejected locally");
            let generation = self.begin(true);
            self.finish(generation, None);
            return Err(error);
        }

        let generation = self.begin(false);
        debug!(email = %form.email(), "Submitting login");
        let outcome = self.auth.login(&form).await;
        self.complete_sign_in(generation, outcome)
    }

    /// Completes the Google sign-in flow with an authorization code.
    ///
    /// # Errors
    /// Returns the classified backend error; the session is logged out.
    pub async fn google_login(&self, code: &str) -> Result<User, RequestError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(RequestError::invalid("authorization code is required"));
        }

        let generation = self.begin(false);
        let outcome = self.auth.google_login(code).await;
        self.complete_sign_in(generation, outcome)
    }

    fn complete_sign_in(
        &self,
        generation: u64,
        outcome: Result<AuthGrant, RequestError>,
    ) -> Result<User, RequestError> {
        match outcome {
            Ok(grant) => {
                let user = grant.user;
                if self.finish(generation, Some(user.clone())) {
                    info!(user_id = %user.id(), "Signed in");
                    Ok(user)
                } else {
                    warn!(user_id = %user.id(), "Sign-in superseded by a newer session operation");
                    Err(RequestError::Superseded)
                }
            }
            Err(e) => {
                warn!(error = %e, "Sign-in failed");
                self.finish(generation, None);
                Err(e)
            }
        }
    }

    /// Signs out.
    ///
    /// The user is cleared locally as soon as the logout starts and stays
    /// cleared whatever the backend answers.
    ///
    /// # Errors
    /// Returns the backend error after local state has been cleared.
    pub async fn logout(&self) -> Result<(), RequestError> {
        let generation = self.begin(true);
        let result = self.auth.logout().await;
        self.finish(generation, None);

        match result {
            Ok(()) => {
                info!("Signed out");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Server-side logout failed, local session cleared anyway");
                Err(e)
            }
        }
    }

    /// Registers a new account. Session state is unchanged.
    ///
    /// # Errors
    /// Returns a validation error for a rejected form or the backend error.
    pub async fn register(&self, form: &RegisterForm) -> Result<(), RequestError> {
        form.validate()?;
        debug!(email = %form.email, "Submitting registration");
        self.auth.register(form).await.inspect(|()| {
            info!(email = %form.email, "Registration accepted");
        })
    }

    /// Returns whether an email can still be registered.
    ///
    /// # Errors
    /// Returns a validation error for a malformed email or the backend error.
    pub async fn email_available(&self, email: &str) -> Result<bool, RequestError> {
        use validator::ValidateEmail;

        let email = email.trim();
        if !email.validate_email() {
            return Err(RequestError::invalid("must be a valid email address"));
        }
        self.auth.email_available(email).await
    }

    /// Returns the Google sign-up URL.
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn google_signup_url(&self) -> Result<String, RequestError> {
        self.auth.google_signup_url().await
    }

    /// Treats a backend auth rejection seen anywhere like a failed session check.
    pub fn handle_request_error(&self, error: &RequestError) {
        if !error.is_auth_error() {
            return;
        }

        if self.state.borrow().current_user.is_some() {
            info!(error = %error, "Session rejected by backend");
        }
        let generation = self.begin(true);
        self.finish(generation, None);
    }

    fn begin(&self, clear_user: bool) -> u64 {
        let mut generation = 0;
        self.state.send_if_modified(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            let changed = !state.is_loading || (clear_user && state.current_user.is_some());
            state.is_loading = true;
            if clear_user {
                state.current_user = None;
            }
            changed
        });
        generation
    }

    fn finish(&self, generation: u64, user: Option<User>) -> bool {
        let mut applied = false;
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            applied = true;
            let changed = state.is_loading || state.current_user != user;
            state.current_user = user;
            state.is_loading = false;
            changed
        });
        applied
    }

    async fn settled(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|state| !state.is_loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::test_support::token_expiring_at;
    use crate::domain::ports::mocks::MockAuthPort;
    use chrono::{Duration as ChronoDuration, Utc};
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    fn store(mock: MockAuthPort) -> (Arc<MockAuthPort>, SessionStore) {
        let mock = Arc::new(mock);
        let store = SessionStore::new(mock.clone());
        (mock, store)
    }

    #[test]
    fn test_initial_state_is_loading_without_user() {
        let (_, store) = store(MockAuthPort::new(true));
        assert_eq!(store.snapshot(), SessionState::initial());
    }

    #[tokio::test]
    async fn test_check_auth_hydrates_user() {
        let (_, store) = store(MockAuthPort::new(true));

        let state = store.check_auth().await;

        assert!(!state.is_loading);
        assert_eq!(state.current_user.unwrap().id().as_str(), "1");
    }

    #[tokio::test]
    async fn test_check_auth_failure_resolves_logged_out() {
        let (_, store) = store(MockAuthPort::new(false));

        let state = store.check_auth().await;

        assert!(!state.is_loading);
        assert!(state.current_user.is_none());
    }

    #[tokio::test]
    async fn test_check_auth_skips_request_for_expired_token() {
        let expired = token_expiring_at((Utc::now() - ChronoDuration::seconds(1)).timestamp());
        let (mock, store) = store(MockAuthPort::with_token(true, expired));

        let state = store.check_auth().await;

        assert!(state.current_user.is_none());
        assert!(!state.is_loading);
        assert_eq!(mock.session_calls(), 0);
    }

    #[tokio::test]
    async fn test_check_auth_queries_backend_for_live_token() {
        let live = token_expiring_at((Utc::now() + ChronoDuration::minutes(10)).timestamp());
        let (mock, store) = store(MockAuthPort::with_token(false, live));

        let state = store.check_auth().await;

        assert!(state.current_user.is_none());
        assert_eq!(mock.session_calls(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_checks_issue_one_request() {
        let (mock, store) = store(MockAuthPort::new(true));
        mock.set_delay(Duration::from_millis(40));

        let (first, second) = tokio::join!(store.check_auth(), store.check_auth());

        assert_eq!(mock.session_calls(), 1);
        assert!(!first.is_loading && !second.is_loading);
        assert_eq!(first.current_user, second.current_user);
        assert!(first.current_user.is_some());
    }

    #[tokio::test]
    async fn test_login_scenario_sets_user() {
        let (_, store) = store(MockAuthPort::new(true));

        let user = assert_ok!(store.login("a@b.com", "Aa1@2345").await);

        assert_eq!(user.id().as_str(), "1");
        assert_eq!(store.current_user().unwrap().id().as_str(), "1");
        assert!(!store.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_login_rejected_clears_user_and_rethrows() {
        let (_, store) = store(MockAuthPort::new(false));

        let error = assert_err!(store.login("a@b.com", "wrong").await);

        assert!(error.is_auth_error());
        assert!(store.current_user().is_none());
        assert!(!store.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_login_invalid_form_never_reaches_backend() {
        let (mock, store) = store(MockAuthPort::new(true));

        let error = assert_err!(store.login("nope", "").await);

        assert!(matches!(error, RequestError::Validation { status: None, .. }));
        assert_eq!(mock.login_calls(), 0);
        assert!(!store.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_logout_clears_user() {
        let (_, store) = store(MockAuthPort::new(true));
        assert_ok!(store.login("a@b.com", "Aa1@2345").await);

        assert_ok!(store.logout().await);

        assert!(store.current_user().is_none());
        assert!(!store.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_logout_clears_user_when_server_fails() {
        let (mock, store) = store(MockAuthPort::new(true));
        assert_ok!(store.login("a@b.com", "Aa1@2345").await);
        mock.set_logout_fails(true);

        let error = assert_err!(store.logout().await);

        assert!(matches!(error, RequestError::Network { .. }));
        assert!(store.current_user().is_none());
        assert!(!store.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_logout_during_check_discards_stale_user() {
        let (mock, store) = store(MockAuthPort::new(true));
        mock.set_delay(Duration::from_millis(50));

        let (checked, logout) = tokio::join!(store.check_auth(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            store.logout().await
        });

        assert_ok!(logout);
        assert!(checked.current_user.is_none());
        assert!(store.current_user().is_none());
        assert!(!store.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_superseded_login_reports_superseded() {
        let (mock, store) = store(MockAuthPort::new(true));
        mock.set_delay(Duration::from_millis(50));

        let (login, _) = tokio::join!(store.login("a@b.com", "Aa1@2345"), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            store.logout().await
        });

        assert_eq!(assert_err!(login), RequestError::Superseded);
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn test_auth_error_elsewhere_logs_out() {
        let (_, store) = store(MockAuthPort::new(true));
        assert_ok!(store.login("a@b.com", "Aa1@2345").await);

        store.handle_request_error(&RequestError::network("blip"));
        assert!(store.current_user().is_some());

        store.handle_request_error(&RequestError::Auth {
            status: 401,
            message: "expired".to_string(),
        });
        assert!(store.current_user().is_none());
        assert!(!store.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let (_, store) = store(MockAuthPort::new(true));
        let mut rx = store.subscribe();
        rx.mark_unchanged();

        store.check_auth().await;

        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().current_user.is_some());
    }

    #[tokio::test]
    async fn test_google_login() {
        let (_, store) = store(MockAuthPort::new(true));

        assert_err!(store.google_login("bad-code").await);
        assert!(store.current_user().is_none());

        assert_ok!(store.google_login("valid-code").await);
        assert!(store.current_user().is_some());
    }

    #[tokio::test]
    async fn test_email_available_validates_locally() {
        let (_, store) = store(MockAuthPort::new(true));

        assert!(matches!(
            store.email_available("nope").await,
            Err(RequestError::Validation { .. })
        ));
        assert!(!store.email_available("a@b.com").await.unwrap());
        assert!(store.email_available("new@b.com").await.unwrap());
    }
}
