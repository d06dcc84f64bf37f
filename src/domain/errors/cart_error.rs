//! Cart error types.

use thiserror::Error;

use crate::domain::entities::CartItemId;

/// Cart mutation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("item {0} is already in the cart")]
    DuplicateItem(CartItemId),
}
