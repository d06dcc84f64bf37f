//! Client-side session record.

use super::entities::{SessionToken, User};

/// Whether a user is authenticated and who they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Authenticated user, `None` when logged out.
    pub current_user: Option<User>,
    /// True while a session check, login or logout is in flight.
    pub is_loading: bool,
}

impl SessionState {
    /// State at application start: unknown user, check pending.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            current_user: None,
            is_loading: true,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Successful sign-in: the user and the token the backend issued, if any.
#[derive(Debug, Clone)]
pub struct AuthGrant {
    pub user: User,
    pub token: Option<SessionToken>,
}

impl AuthGrant {
    #[must_use]
    pub const fn new(user: User, token: Option<SessionToken>) -> Self {
        Self { user, token }
    }
}
