//! Domain entity definitions.

mod cart;
mod catalog;
mod token;
mod user;

pub use cart::{CartItem, CartItemId, CartState, MAX_QUANTITY};
pub use catalog::{Station, TicketType};
pub use token::{SESSION_COOKIE, SessionToken, TokenClaims};
pub use user::{Profile, User, UserId};

#[cfg(test)]
pub(crate) use token::test_support;
