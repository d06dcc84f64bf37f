//! Domain error types.

mod cart_error;
mod request_error;

pub use cart_error::CartError;
pub use request_error::{FieldErrors, RequestError};
