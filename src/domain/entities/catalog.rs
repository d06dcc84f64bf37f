//! Station and ticket catalog records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::serde_utils;

/// Metro station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    #[serde(deserialize_with = "serde_utils::id_string")]
    pub id: String,
    pub name: String,
    /// Line the station belongs to, when the backend reports one.
    #[serde(default)]
    pub line: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Purchasable ticket type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketType {
    #[serde(deserialize_with = "serde_utils::id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    /// Number of rides included, `None` for unlimited passes.
    #[serde(default)]
    pub trips: Option<u32>,
    #[serde(default)]
    pub validity_days: Option<u32>,
}

impl TicketType {
    /// Returns a one-line summary for listings.
    #[must_use]
    pub fn summary(&self) -> String {
        let rides = self
            .trips
            .map_or_else(|| "unlimited rides".to_string(), |n| format!("{n} rides"));
        let validity = self
            .validity_days
            .map(|days| format!(", valid {days} days"))
            .unwrap_or_default();

        format!("{} ({rides}{validity}) - ${}", self.name, self.price)
    }
}
