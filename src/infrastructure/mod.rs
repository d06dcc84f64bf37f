//! Infrastructure layer with external service adapters.

/// Backend REST client and port adapters.
pub mod backend;
/// Application configuration.
pub mod config;
/// Live WebSocket connection.
pub mod live;
/// Local `/api/auth` proxy.
pub mod proxy;

pub use backend::{ApiClient, BackendAuthClient, BackendCatalogClient, RequestOptions};
pub use config::{AppConfig, CliArgs, Command, Environment, LogLevel, StorageManager};
pub use live::{LiveError, LiveEvent, LiveHandle, LiveProvider};
pub use proxy::{ProxyError, ProxyState};
