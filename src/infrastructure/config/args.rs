use super::app_config::{Environment, LogLevel};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "metro-tickets",
    version,
    about = "Customer client for the metro ticketing backend",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Backend environment.
    #[arg(long, value_enum, env = "METRO_ENV")]
    pub environment: Option<Environment>,

    /// Backend origin.
    #[arg(long, value_name = "URL", env = "METRO_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Live WebSocket endpoint.
    #[arg(long, value_name = "URL", env = "METRO_LIVE_URL")]
    pub live_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Interactive shell (default).
    Shell,
    /// Serve the `/api/auth` proxy.
    Proxy {
        /// Listen address.
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },
}

impl CliArgs {
    /// Returns the selected command, defaulting to the shell.
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Shell)
    }

    pub(super) fn proxy_bind(&self) -> Option<SocketAddr> {
        match &self.command {
            Some(Command::Proxy { bind }) => *bind,
            _ => None,
        }
    }
}
