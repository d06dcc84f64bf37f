//! Backend REST adapters.

mod auth;
mod catalog;
mod client;
pub mod dto;

pub use auth::BackendAuthClient;
pub use catalog::BackendCatalogClient;
pub use client::{ApiClient, ApiResponse, ForwardRequest, ForwardedResponse, RequestOptions};
