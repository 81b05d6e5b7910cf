pub mod normalize;
pub mod provider;
pub mod raw;
pub mod tmdb;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    /// Transport or authentication failure talking to the catalog.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    #[error("unsupported media kind: {0}")]
    UnsupportedKind(String),
    #[error("catalog item not found")]
    NotFound,
    #[error("malformed catalog record: {0}")]
    Malformed(String),
}

pub use normalize::normalize;
pub use provider::{CatalogProvider, RawDetailRecord};
pub use tmdb::TmdbClient;
