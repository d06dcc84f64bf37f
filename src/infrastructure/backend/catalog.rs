//! Backend catalog adapter.

use std::sync::Arc;

use async_trait::async_trait;

use super::client::{ApiClient, RequestOptions};
use crate::domain::entities::{Station, TicketType};
use crate::domain::errors::RequestError;
use crate::domain::ports::CatalogPort;

/// `CatalogPort` over `/stations` and `/ticket`.
pub struct BackendCatalogClient {
    api: Arc<ApiClient>,
}

impl BackendCatalogClient {
    #[must_use]
    pub const fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

/// Rejects ids that would change the request path.
fn path_segment(id: &str) -> Result<&str, RequestError> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) {
        return Err(RequestError::invalid(format!("invalid station id: {id:?}")));
    }
    Ok(id)
}

#[async_trait]
impl CatalogPort for BackendCatalogClient {
    async fn stations(&self) -> Result<Vec<Station>, RequestError> {
        Ok(self.api.get("/stations", &RequestOptions::new()).await?.data)
    }

    async fn station(&self, id: &str) -> Result<Station, RequestError> {
        let id = path_segment(id)?;
        Ok(self
            .api
            .get(&format!("/stations/{id}"), &RequestOptions::new())
            .await?
            .data)
    }

    async fn ticket_types(&self) -> Result<Vec<TicketType>, RequestError> {
        Ok(self
            .api
            .get("/ticket/ticket-types", &RequestOptions::new())
            .await?
            .data)
    }

    async fn best_ticket(&self, email: &str) -> Result<TicketType, RequestError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(RequestError::invalid("email is required"));
        }
        let options = RequestOptions::new().query("email", email);
        Ok(self.api.get("/ticket/best-ticket", &options).await?.data)
    }
}
