use reelsync_core::{CatalogSearchResult, MediaKind};

use crate::MetadataError;

/// A media catalog that can search by title and fetch full item details.
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Search every media kind by title, best match first.
    ///
    /// An empty list means the title is unknown to the catalog; transport
    /// problems surface as [`MetadataError::Unavailable`] instead.
    async fn search(&self, title: &str) -> Result<Vec<CatalogSearchResult>, MetadataError>;

    /// Fetch the detail record for one item with its credits, release
    /// dates, videos and watch providers attached.
    async fn fetch_details(
        &self,
        catalog_id: u64,
        kind: &MediaKind,
    ) -> Result<RawDetailRecord, MetadataError>;
}

/// Untyped detail payload for one catalog item.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetailRecord {
    pub catalog_id: u64,
    pub kind: MediaKind,
    pub body: serde_json::Value,
}
