pub mod error;
pub mod languages;
pub mod record;
pub mod types;

pub use error::LanguageError;
pub use languages::LanguageTable;
pub use record::{Field, FieldValue, NormalizedRecord, RecordBuilder};
pub use types::{CatalogSearchResult, MediaKind, PENDING_SENTINEL, PendingEntry};
