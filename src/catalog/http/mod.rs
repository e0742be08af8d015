mod config;
mod error;
mod store;

pub use config::HttpCatalogConfig;
pub use error::{HttpCatalogError, HttpCatalogResult};
pub use store::HttpCatalog;
