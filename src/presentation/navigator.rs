//! Navigation with guard re-entry.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::{debug, warn};

use super::guard::{AuthGuard, GuardDecision};
use super::routes::Route;
use crate::domain::session::SessionState;

/// Redirect hops followed before a navigation is declared a loop.
pub const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no route for {0:?}")]
    UnknownRoute(String),

    #[error("redirect loop starting at {from} after {hops} hops")]
    RedirectLoop { from: Route, hops: usize },
}

/// Settled result of a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Route the user ends up on.
    pub route: Route,
    /// Guard verdict for that route.
    pub decision: GuardDecision,
    /// Redirects followed on the way, in order.
    pub redirects: Vec<Route>,
}

impl Navigation {
    #[must_use]
    pub fn redirected(&self) -> bool {
        !self.redirects.is_empty()
    }
}

/// Token tying a page load to the view that started it.
#[derive(Debug, Clone)]
pub struct ViewScope {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl ViewScope {
    /// False once the user navigated elsewhere.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}

/// Tracks the current route and runs every navigation through the guard.
#[derive(Debug)]
pub struct Navigator {
    current: Route,
    guard: AuthGuard,
    generation: Arc<AtomicU64>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: Route::Landing,
            guard: AuthGuard::new(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    #[must_use]
    pub const fn current(&self) -> Route {
        self.current
    }

    /// Returns a scope valid until the next route change.
    #[must_use]
    pub fn scope(&self) -> ViewScope {
        ViewScope {
            generation: self.generation.load(Ordering::SeqCst),
            current: self.generation.clone(),
        }
    }

    /// Navigates to a path or route name.
    ///
    /// # Errors
    /// Returns `UnknownRoute` or `RedirectLoop`.
    pub fn go_path(
        &mut self,
        path: &str,
        state: &SessionState,
    ) -> Result<Navigation, NavigationError> {
        let route =
            Route::from_path(path).ok_or_else(|| NavigationError::UnknownRoute(path.to_string()))?;
        self.go(route, state)
    }

    /// Explicit navigation requested by the user.
    ///
    /// # Errors
    /// Returns `RedirectLoop` if the guard keeps redirecting.
    pub fn go(&mut self, route: Route, state: &SessionState) -> Result<Navigation, NavigationError> {
        self.guard.reset();
        self.settle(route, state)
    }

    /// Re-evaluates the current route after a session change.
    ///
    /// # Errors
    /// Returns `RedirectLoop` if the guard keeps redirecting.
    pub fn refresh(&mut self, state: &SessionState) -> Result<Navigation, NavigationError> {
        self.settle(self.current, state)
    }

    fn settle(&mut self, start: Route, state: &SessionState) -> Result<Navigation, NavigationError> {
        let mut route = start;
        let mut redirects = Vec::new();

        loop {
            match self.guard.evaluate(route, state) {
                GuardDecision::Redirect(target) => {
                    if redirects.len() == MAX_REDIRECTS {
                        warn!(from = %start, hops = redirects.len(), "Redirect loop detected");
                        return Err(NavigationError::RedirectLoop {
                            from: start,
                            hops: redirects.len(),
                        });
                    }
                    redirects.push(target);
                    route = target;
                }
                decision => {
                    self.enter(route);
                    return Ok(Navigation {
                        route,
                        decision,
                        redirects,
                    });
                }
            }
        }
    }

    fn enter(&mut self, route: Route) {
        if self.current != route {
            debug!(from = %self.current, to = %route, "Route changed");
            self.current = route;
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
    }
}
