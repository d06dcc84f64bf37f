//! Catalog port definition.

use async_trait::async_trait;

use crate::domain::entities::{Station, TicketType};
use crate::domain::errors::RequestError;

/// Port for station and ticket lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogPort: Send + Sync {
    async fn stations(&self) -> Result<Vec<Station>, RequestError>;

    async fn station(&self, id: &str) -> Result<Station, RequestError>;

    async fn ticket_types(&self) -> Result<Vec<TicketType>, RequestError>;

    /// Returns the ticket type the backend recommends for a customer.
    async fn best_ticket(&self, email: &str) -> Result<TicketType, RequestError>;
}
