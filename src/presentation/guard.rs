//! Route protection.

use tracing::debug;

use super::routes::{Route, RouteAccess};
use crate::domain::session::SessionState;

/// What a view should do for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving: show a placeholder, do not redirect.
    Loading,
    /// Navigate elsewhere instead of rendering.
    Redirect(Route),
    /// A redirect for this state was already issued; render nothing.
    AwaitingRedirect,
    Render,
}

/// Pure decision for a session state and route access.
#[must_use]
pub fn decide(state: &SessionState, access: RouteAccess) -> GuardDecision {
    if access == RouteAccess::Public {
        return GuardDecision::Render;
    }
    if state.is_loading {
        return GuardDecision::Loading;
    }

    match (state.is_authenticated(), access) {
        (false, RouteAccess::Protected) => GuardDecision::Redirect(Route::LOGIN),
        (true, RouteAccess::GuestOnly) => GuardDecision::Redirect(Route::HOME),
        _ => GuardDecision::Render,
    }
}

/// Guard that issues each redirect once per state transition.
///
/// Re-evaluating the same route with the same authentication outcome after
/// a redirect yields `AwaitingRedirect` instead of a second navigation.
#[derive(Debug, Default)]
pub struct AuthGuard {
    last_redirect: Option<(Route, bool)>,
}

impl AuthGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, route: Route, state: &SessionState) -> GuardDecision {
        let decision = decide(state, route.access());

        match decision {
            GuardDecision::Redirect(target) => {
                let key = (route, state.is_authenticated());
                if self.last_redirect == Some(key) {
                    return GuardDecision::AwaitingRedirect;
                }
                debug!(from = %route, to = %target, "Guard redirect");
                self.last_redirect = Some(key);
                decision
            }
            GuardDecision::Render => {
                self.last_redirect = None;
                decision
            }
            GuardDecision::Loading | GuardDecision::AwaitingRedirect => decision,
        }
    }

    /// Forgets issued redirects, for an explicit navigation.
    pub fn reset(&mut self) {
        self.last_redirect = None;
    }
}
