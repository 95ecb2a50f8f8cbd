use error::CatalogError;

pub mod auth;
pub mod database;
pub mod error;
pub mod preference;
pub mod reference;
pub mod resolve;
pub mod revision_info;

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
