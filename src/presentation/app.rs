//! Application wiring and startup.

use std::sync::Arc;

use tokio::io::{BufReader, stdin, stdout};
use tracing::{info, warn};

use super::shell::Shell;
use crate::application::{CartStore, CatalogService, SessionStore};
use crate::domain::errors::RequestError;
use crate::domain::ports::{AuthPort, CatalogPort};
use crate::infrastructure::{
    ApiClient, AppConfig, BackendAuthClient, BackendCatalogClient, LiveProvider,
};

/// Stores and services shared by every page.
#[derive(Clone)]
pub struct AppContext {
    pub session: Arc<SessionStore>,
    pub cart: Arc<CartStore>,
    pub catalog: CatalogService,
}

impl AppContext {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthPort>, catalog: Arc<dyn CatalogPort>) -> Self {
        let session = Arc::new(SessionStore::new(auth));
        let catalog = CatalogService::new(catalog, session.clone());

        Self {
            session,
            cart: Arc::new(CartStore::new()),
            catalog,
        }
    }

    /// Wires the backend adapters around one cookie-carrying client.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, RequestError> {
        let api = Arc::new(ApiClient::from_config(config)?);

        Ok(Self::new(
            Arc::new(BackendAuthClient::new(api.clone())),
            Arc::new(BackendCatalogClient::new(api)),
        ))
    }
}

/// Interactive client: session bootstrap, live feed and shell.
pub struct App {
    ctx: AppContext,
    live: Option<LiveProvider>,
}

impl App {
    #[must_use]
    pub const fn new(ctx: AppContext, live: Option<LiveProvider>) -> Self {
        Self { ctx, live }
    }

    /// # Errors
    /// Returns error if the backend client cannot be built.
    pub fn from_config(config: &AppConfig) -> color_eyre::Result<Self> {
        let ctx = AppContext::from_config(config)?;
        Ok(Self::new(ctx, Some(LiveProvider::from_config(config))))
    }

    /// # Errors
    /// Returns error if reading commands or writing output fails.
    pub async fn run(self) -> color_eyre::Result<()> {
        let mut shell = Shell::new(self.ctx.clone(), BufReader::new(stdin()), stdout());

        let session = self.ctx.session.clone();
        let check = tokio::spawn(async move { session.check_auth().await });

        if let Some(provider) = &self.live {
            match provider.mount().await {
                Ok(handle) => {
                    info!(url = provider.url(), "Live connection mounted");
                    shell = shell.with_live(handle);
                }
                Err(e) => warn!(url = provider.url(), error = %e, "Live connection unavailable"),
            }
        }

        shell.run().await?;

        if let Some(handle) = shell.take_live() {
            handle.close().await;
        }
        check.abort();

        info!("Application exiting normally");
        Ok(())
    }
}
