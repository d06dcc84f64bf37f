//! Shopping cart store.

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::debug;

use crate::domain::entities::{CartItem, CartItemId, CartState};
use crate::domain::errors::CartError;

/// In-memory cart shared by the pages that sell tickets.
///
/// Lives for the application lifetime and is never persisted.
pub struct CartStore {
    state: watch::Sender<CartState>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(CartState::default());
        Self { state }
    }

    /// Shows the cart panel. Does nothing if already open.
    pub fn open(&self) {
        self.set_open(true);
    }

    /// Hides the cart panel. Does nothing if already closed.
    pub fn close(&self) {
        self.set_open(false);
    }

    fn set_open(&self, open: bool) {
        self.state.send_if_modified(|state| {
            if state.is_open == open {
                return false;
            }
            state.is_open = open;
            true
        });
    }

    /// Appends a line.
    ///
    /// # Errors
    /// Returns `DuplicateItem` if a line with the same id is already present.
    pub fn add_item(&self, item: CartItem) -> Result<CartItemId, CartError> {
        let id = item.id;
        let mut duplicate = false;

        self.state.send_if_modified(|state| {
            if state.contains(id) {
                duplicate = true;
                return false;
            }
            debug!(item_id = %id, ticket_type = %item.ticket_type_id, quantity = item.quantity, "Adding cart line");
            state.items.push(item);
            true
        });

        if duplicate {
            Err(CartError::DuplicateItem(id))
        } else {
            Ok(id)
        }
    }

    /// Removes a line and returns it. Unknown ids leave the cart untouched.
    pub fn remove_item(&self, id: CartItemId) -> Option<CartItem> {
        let mut removed = None;

        self.state.send_if_modified(|state| {
            let Some(index) = state.items.iter().position(|item| item.id == id) else {
                return false;
            };
            removed = Some(state.items.remove(index));
            true
        });

        if removed.is_some() {
            debug!(item_id = %id, "Removed cart line");
        }
        removed
    }

    /// Drops every line, keeping the open flag.
    pub fn clear(&self) {
        self.state.send_if_modified(|state| {
            if state.items.is_empty() {
                return false;
            }
            state.items.clear();
            true
        });
    }

    /// Cart total, `None` if it overflows.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        self.state.borrow().total()
    }

    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }
}
