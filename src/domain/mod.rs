//! Domain layer with core entities, forms and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Login and registration forms.
pub mod forms;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;
/// Session record.
pub mod session;

pub use entities::{CartItem, CartItemId, CartState, SessionToken, Station, TicketType, User};
pub use errors::{CartError, RequestError};
pub use forms::{LoginForm, RegisterForm};
pub use ports::{AuthPort, CatalogPort};
pub use session::{AuthGrant, SessionState};
