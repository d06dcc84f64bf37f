//! Station and ticket catalog lookups.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::services::SessionStore;
use crate::domain::entities::{Station, TicketType};
use crate::domain::errors::RequestError;
use crate::domain::ports::CatalogPort;

/// Catalog reads that report expired sessions to the session store.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogPort>,
    session: Arc<SessionStore>,
}

impl CatalogService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogPort>, session: Arc<SessionStore>) -> Self {
        Self { catalog, session }
    }

    /// Lists every station.
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn stations(&self) -> Result<Vec<Station>, RequestError> {
        let stations = self.observe(self.catalog.stations().await)?;
        debug!(count = stations.len(), "Loaded stations");
        Ok(stations)
    }

    /// Fetches one station.
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn station(&self, id: &str) -> Result<Station, RequestError> {
        self.observe(self.catalog.station(id).await)
    }

    /// Lists purchasable ticket types.
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn ticket_types(&self) -> Result<Vec<TicketType>, RequestError> {
        let types = self.observe(self.catalog.ticket_types().await)?;
        debug!(count = types.len(), "Loaded ticket types");
        Ok(types)
    }

    /// Fetches the recommended ticket type for a customer.
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn best_ticket(&self, email: &str) -> Result<TicketType, RequestError> {
        self.observe(self.catalog.best_ticket(email).await)
    }

    fn observe<T>(&self, result: Result<T, RequestError>) -> Result<T, RequestError> {
        result.inspect_err(|e| {
            warn!(error = %e, "Catalog request failed");
            self.session.handle_request_error(e);
        })
    }
}
