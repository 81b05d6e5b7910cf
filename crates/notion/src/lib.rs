pub mod client;
pub mod properties;
pub mod store;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotionError {
    #[error("network error: {0}")]
    Network(String),
    #[error("notion API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
    #[error("unexpected notion response: {0}")]
    Malformed(String),
}

pub use client::NotionClient;
pub use properties::{PropertyKind, PropertySchema};
pub use store::{PageStore, TitleFilter};
