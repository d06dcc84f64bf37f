//! Route table.

use std::fmt;

/// Who may see a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteAccess {
    /// Shown to everyone, bypasses the guard.
    Public,
    /// Only for visitors without a session (login, registration).
    GuestOnly,
    /// Requires an authenticated user.
    Protected,
}

impl RouteAccess {
    /// Whether the guard demands a session.
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        matches!(self, Self::Protected)
    }
}

/// Customer-facing views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Register,
    Activation,
    Dashboard,
    Payment,
    Profile,
    Invoices,
}

impl Route {
    pub const ALL: [Self; 8] = [
        Self::Landing,
        Self::Login,
        Self::Register,
        Self::Activation,
        Self::Dashboard,
        Self::Payment,
        Self::Profile,
        Self::Invoices,
    ];

    /// Route unauthenticated visitors are sent to.
    pub const LOGIN: Self = Self::Login;
    /// Route authenticated users are sent to from guest-only views.
    pub const HOME: Self = Self::Landing;

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/auth/login",
            Self::Register => "/auth/register",
            Self::Activation => "/activation",
            Self::Dashboard => "/dashboard",
            Self::Payment => "/payment",
            Self::Profile => "/profile",
            Self::Invoices => "/invoices",
        }
    }

    /// Short name accepted by the shell (`go dashboard`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Landing => "home",
            Self::Login => "login",
            Self::Register => "register",
            Self::Activation => "activation",
            Self::Dashboard => "dashboard",
            Self::Payment => "payment",
            Self::Profile => "profile",
            Self::Invoices => "invoices",
        }
    }

    #[must_use]
    pub const fn access(self) -> RouteAccess {
        match self {
            Self::Landing => RouteAccess::Public,
            Self::Login | Self::Register => RouteAccess::GuestOnly,
            Self::Activation | Self::Dashboard | Self::Payment | Self::Profile | Self::Invoices => {
                RouteAccess::Protected
            }
        }
    }

    /// Resolves a path (`/dashboard`, trailing slash tolerated) or a short name.
    #[must_use]
    pub fn from_path(input: &str) -> Option<Self> {
        let input = input.trim();
        let path = match input.trim_end_matches('/') {
            "" if input.starts_with('/') => "/",
            trimmed => trimmed,
        };

        Self::ALL
            .into_iter()
            .find(|route| route.path() == path || route.name().eq_ignore_ascii_case(path))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
