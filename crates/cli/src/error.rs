use reelsync_metadata::MetadataError;
use reelsync_notion::NotionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The pending query came back empty. Ends the whole run.
    #[error("no entries found in the database query")]
    NoEntriesFound,

    #[error("no catalog results for \"{title}\"")]
    NotFound { title: String },

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Notion(#[from] NotionError),
}
