pub mod config;
pub mod error;
pub mod sync;

pub use config::Config;
pub use error::SyncError;
pub use sync::{EntryOutcome, SkipReason, SyncDriver, SyncOptions, SyncReport};
