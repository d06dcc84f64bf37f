//! Presentation layer: routes, guard, navigation and the interactive shell.

mod app;
/// Route protection.
pub mod guard;
/// Navigation with guard re-entry.
pub mod navigator;
/// Plain-text page shells.
pub mod pages;
/// Route table.
pub mod routes;
/// Interactive shell.
pub mod shell;

pub use app::{App, AppContext};
pub use guard::{AuthGuard, GuardDecision};
pub use navigator::{Navigation, NavigationError, Navigator, ViewScope};
pub use routes::{Route, RouteAccess};
pub use shell::{Shell, ShellCommand};
