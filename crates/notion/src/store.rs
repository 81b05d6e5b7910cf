use reelsync_core::{NormalizedRecord, PENDING_SENTINEL, PendingEntry};

use crate::NotionError;

/// Which pages a query selects, matched against the title property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleFilter {
    EndsWith(String),
    Equals(String),
}

impl TitleFilter {
    /// Pages whose title ends with the pending sentinel.
    pub fn pending() -> Self {
        Self::EndsWith(PENDING_SENTINEL.to_string())
    }

    /// Notion database filter object for `title_property`.
    pub fn to_json(&self, title_property: &str) -> serde_json::Value {
        let condition = match self {
            Self::EndsWith(suffix) => serde_json::json!({ "ends_with": suffix }),
            Self::Equals(title) => serde_json::json!({ "equals": title }),
        };
        serde_json::json!({
            "property": title_property,
            "title": condition,
        })
    }
}

/// The page database that receives normalized records.
///
/// Property updates and the icon/cover writes are separate calls; a failure
/// between them leaves the page partially updated.
#[async_trait::async_trait]
pub trait PageStore: Send + Sync {
    /// All pages matching `filter`, in database order.
    async fn query(&self, filter: &TitleFilter) -> Result<Vec<PendingEntry>, NotionError>;

    async fn update_properties(
        &self,
        page_id: &str,
        record: &NormalizedRecord,
    ) -> Result<(), NotionError>;

    async fn set_icon(&self, page_id: &str, url: &str) -> Result<(), NotionError>;

    async fn set_cover(&self, page_id: &str, url: &str) -> Result<(), NotionError>;
}
