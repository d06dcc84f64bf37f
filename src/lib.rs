//! Metro Tickets - customer client for a metro ticketing backend.
//!
//! This crate keeps the client-side session and cart, guards routes on the
//! session state, talks to the backend over HTTP and WebSocket, and exposes
//! a local `/api/auth` proxy next to an interactive shell.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the session, cart and catalog services.
pub mod application;
/// Domain layer containing entities, errors, forms and port definitions.
pub mod domain;
/// Infrastructure layer containing backend, live, proxy and config adapters.
pub mod infrastructure;
/// Presentation layer containing routes, the guard and the shell.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "metro-tickets";
