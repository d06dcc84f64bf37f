//! Cart line items and cart state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TicketType;

/// Largest quantity a single cart line may hold.
pub const MAX_QUANTITY: u32 = 99;

/// Identity key of a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartItemId(Uuid);

impl CartItemId {
    /// Mints a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns a short prefix for display and lookup.
    #[must_use]
    pub fn short(&self) -> String {
        self.0.simple().to_string().chars().take(8).collect()
    }
}

impl Default for CartItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CartItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CartItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub ticket_type_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartItem {
    /// Creates a new line for `quantity` tickets of a type, clamped to
    /// `1..=MAX_QUANTITY`.
    #[must_use]
    pub fn from_ticket(ticket: &TicketType, quantity: u32) -> Self {
        Self {
            id: CartItemId::new(),
            ticket_type_id: ticket.id.clone(),
            name: ticket.name.clone(),
            unit_price: ticket.price,
            quantity: quantity.clamp(1, MAX_QUANTITY),
        }
    }

    /// Unit price times quantity, `None` if it does not fit a `Decimal`.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Cart visibility flag and ordered lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    pub is_open: bool,
    pub items: Vec<CartItem>,
}

impl CartState {
    #[must_use]
    pub fn contains(&self, id: CartItemId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Finds a line by full id or by the prefix shown in listings.
    #[must_use]
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&CartItem> {
        let prefix = prefix.trim().to_ascii_lowercase();
        if prefix.is_empty() {
            return None;
        }

        let mut matches = self.items.iter().filter(|item| {
            item.id.to_string().starts_with(&prefix) || item.id.short().starts_with(&prefix)
        });
        let first = matches.next()?;
        matches.next().is_none().then_some(first)
    }

    /// Sum of all subtotals, `None` on overflow.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.subtotal()?))
    }

    #[must_use]
    pub fn ticket_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
