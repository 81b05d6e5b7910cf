//! Batch driver: pending pages in, catalog metadata out.
//!
//! Entries are processed one at a time in query order. Per-entry failures
//! are logged and counted; only an empty pending list ends the run.

use reelsync_core::{Field, LanguageTable, NormalizedRecord, PendingEntry};
use reelsync_metadata::{CatalogProvider, MetadataError, normalize};
use reelsync_notion::{PageStore, TitleFilter};
use tracing::{error, info, warn};

use crate::error::SyncError;

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Normalize and log records without writing to the database.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotFound,
    UnsupportedKind(String),
    /// The normalized record had nothing to write.
    NoFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Updated { fields: usize },
    DryRun { fields: usize },
    Skipped(SkipReason),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub updated: usize,
    /// Entries that would have been written, in a dry run.
    pub dry_run: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<(PendingEntry, EntryOutcome)>,
}

impl SyncReport {
    fn record(&mut self, entry: &PendingEntry, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::Updated { .. } => self.updated += 1,
            EntryOutcome::DryRun { .. } => self.dry_run += 1,
            EntryOutcome::Skipped(_) => self.skipped += 1,
            EntryOutcome::Failed(_) => self.failed += 1,
        }
        self.outcomes.push((entry.clone(), outcome));
    }
}

pub struct SyncDriver<'a> {
    catalog: &'a dyn CatalogProvider,
    store: &'a dyn PageStore,
    languages: &'a LanguageTable,
    options: SyncOptions,
}

impl<'a> SyncDriver<'a> {
    pub fn new(
        catalog: &'a dyn CatalogProvider,
        store: &'a dyn PageStore,
        languages: &'a LanguageTable,
        options: SyncOptions,
    ) -> Self {
        Self {
            catalog,
            store,
            languages,
            options,
        }
    }

    /// Sync every page matching `filter`.
    ///
    /// Fails with [`SyncError::NoEntriesFound`] when nothing matches, and
    /// propagates a failed query. Everything else is reported per entry.
    pub async fn run(&self, filter: &TitleFilter) -> Result<SyncReport, SyncError> {
        let entries = self.store.query(filter).await?;
        if entries.is_empty() {
            return Err(SyncError::NoEntriesFound);
        }
        info!(count = entries.len(), "found pending entries");

        let mut report = SyncReport::default();
        for entry in &entries {
            let outcome = match self.sync_entry(entry).await {
                Ok(outcome) => outcome,
                Err(SyncError::NotFound { title }) => {
                    warn!(page_id = %entry.page_id, title = %title, "no catalog results, skipping");
                    EntryOutcome::Skipped(SkipReason::NotFound)
                }
                Err(SyncError::Metadata(MetadataError::UnsupportedKind(kind))) => {
                    warn!(page_id = %entry.page_id, kind = %kind, "unsupported media kind, skipping");
                    EntryOutcome::Skipped(SkipReason::UnsupportedKind(kind))
                }
                Err(e) => {
                    error!(page_id = %entry.page_id, title = %entry.raw_title, error = %e, "entry failed");
                    EntryOutcome::Failed(e.to_string())
                }
            };
            report.record(entry, outcome);
        }

        Ok(report)
    }

    async fn sync_entry(&self, entry: &PendingEntry) -> Result<EntryOutcome, SyncError> {
        let title = entry.search_title();
        if title.is_empty() {
            return Err(SyncError::NotFound {
                title: title.to_string(),
            });
        }
        let results = self.catalog.search(title).await?;

        // First result wins; no ranking beyond catalog order.
        let Some(best) = results.into_iter().next() else {
            return Err(SyncError::NotFound {
                title: title.to_string(),
            });
        };
        info!(
            page_id = %entry.page_id,
            catalog = self.catalog.name(),
            title,
            catalog_id = best.catalog_id,
            kind = %best.kind,
            matched = %best.title,
            "matched catalog entry"
        );

        let raw = self
            .catalog
            .fetch_details(best.catalog_id, &best.kind)
            .await?;
        let record = normalize(&raw.body, &raw.kind, self.languages)?;

        if record.is_empty() {
            warn!(page_id = %entry.page_id, kind = %raw.kind, "no fields to write, skipping");
            return Ok(EntryOutcome::Skipped(SkipReason::NoFields));
        }

        if self.options.dry_run {
            let json = serde_json::to_string(&record).unwrap_or_default();
            info!(page_id = %entry.page_id, record = %json, "dry run, not writing");
            return Ok(EntryOutcome::DryRun {
                fields: record.len(),
            });
        }

        self.push(&entry.page_id, &record).await?;
        info!(page_id = %entry.page_id, fields = ?record.field_names(), "page updated");

        Ok(EntryOutcome::Updated {
            fields: record.len(),
        })
    }

    /// Three separate writes: properties, then icon, then cover.
    async fn push(&self, page_id: &str, record: &NormalizedRecord) -> Result<(), SyncError> {
        self.store.update_properties(page_id, record).await?;

        if let Some(poster) = record.text(Field::PosterPath) {
            self.store.set_icon(page_id, poster).await?;
        }
        if let Some(backdrop) = record.text(Field::BackdropPath) {
            self.store.set_cover(page_id, backdrop).await?;
        }
        Ok(())
    }
}
