//! Application layer with the stateful services shared by every page.

/// Session, cart and catalog services.
pub mod services;

pub use services::{CartStore, CatalogService, SessionStore};
