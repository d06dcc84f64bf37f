//! Application configuration.

pub mod app_config;
pub mod args;
pub mod storage;

pub use app_config::{ApiConfig, AppConfig, Environment, LiveConfig, LogLevel, ProxyConfig};
pub use args::{CliArgs, Command};
pub use storage::{ConfigError, StorageManager};
