mod cart_store;
mod catalog_service;
mod session_store;

pub use cart_store::CartStore;
pub use catalog_service::CatalogService;
pub use session_store::SessionStore;
