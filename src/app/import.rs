// MyRent - app/import.rs
//
// Import run orchestration: parse → normalise → filter → dedup → persist.
//
// Atomicity: the accepted set is computed in full before the single bulk
// insert, so any failure before that point leaves the store untouched and
// the insert itself is all-or-nothing at the store level.
//
// Not reentrant against one store: the address snapshot is taken once at
// the start of a run, so callers must serialise imports.

use crate::core::dedup::{deduplicate, is_valid_candidate, Deduplicator};
use crate::core::fields::{AliasTable, FieldResolver};
use crate::core::header::locate_header_row;
use crate::core::model::{ImportSummary, PropertyRecord};
use crate::core::normalize::{normalize_backup, normalize_row};
use crate::core::source::{self, SourceKind};
use crate::core::store::PropertyStore;
use crate::platform::fs::read_import_file;
use crate::util::error::ImportError;
use chrono::{DateTime, Utc};
use std::path::Path;

/// One import run bound to a caller-owned store handle.
pub struct ImportPipeline<'s, S: PropertyStore + ?Sized> {
    store: &'s mut S,
    aliases: AliasTable,
}

impl<'s, S: PropertyStore + ?Sized> ImportPipeline<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self {
            store,
            aliases: AliasTable::default(),
        }
    }

    /// Replace the header alias table used for tabular sources.
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    /// Read `path` (bounded by `max_size`), detect its kind from the
    /// extension, and import it.
    pub fn import_file(&mut self, path: &Path, max_size: u64) -> Result<ImportSummary, ImportError> {
        let kind = SourceKind::from_path(path)?;
        let bytes = read_import_file(path, max_size)?;
        tracing::info!(path = %path.display(), ?kind, "Import started");
        self.run(&bytes, kind)
    }

    /// Import `payload` as `kind`, stamping new records with the current time.
    pub fn run(&mut self, payload: &[u8], kind: SourceKind) -> Result<ImportSummary, ImportError> {
        self.run_at(payload, kind, Utc::now())
    }

    /// Import with an explicit normalisation instant.
    pub fn run_at(
        &mut self,
        payload: &[u8],
        kind: SourceKind,
        now: DateTime<Utc>,
    ) -> Result<ImportSummary, ImportError> {
        let candidates = match kind {
            SourceKind::Tabular(format) => self.normalize_tabular(payload, format, now)?,
            SourceKind::Backup => normalize_backups(payload, now)?,
        };
        let parsed = candidates.len();

        let valid: Vec<PropertyRecord> =
            candidates.into_iter().filter(is_valid_candidate).collect();
        tracing::debug!(parsed, valid = valid.len(), "Validity filter applied");

        let existing = self
            .store
            .addresses()
            .map_err(|source| ImportError::Store { source })?;
        let mut dedup = Deduplicator::new(existing);
        let outcome = deduplicate(valid, &mut dedup);

        let inserted = outcome.accepted.len();
        if inserted > 0 {
            self.store
                .bulk_insert(outcome.accepted)
                .map_err(|source| ImportError::StorageWrite { source })?;
        }

        let summary = ImportSummary {
            inserted,
            skipped_duplicates: outcome.skipped_duplicates,
        };
        tracing::info!(
            inserted = summary.inserted,
            skipped_duplicates = summary.skipped_duplicates,
            "Import finished"
        );
        Ok(summary)
    }

    fn normalize_tabular(
        &self,
        payload: &[u8],
        format: source::TabularFormat,
        now: DateTime<Utc>,
    ) -> Result<Vec<PropertyRecord>, ImportError> {
        let rows = source::read_rows(payload, format)?;
        let header_index = locate_header_row(&rows);
        let fields = source::rows_to_fields(&rows, header_index);
        tracing::debug!(
            rows = rows.len(),
            header_index,
            data_rows = fields.len(),
            "Tabular source parsed"
        );

        if fields.is_empty() {
            return Err(ImportError::EmptyData);
        }

        Ok(fields
            .iter()
            .map(|row| normalize_row(&FieldResolver::new(&self.aliases, row), now))
            .collect())
    }
}

fn normalize_backups(payload: &[u8], now: DateTime<Utc>) -> Result<Vec<PropertyRecord>, ImportError> {
    let items = source::parse_backup(payload)?;
    tracing::debug!(objects = items.len(), "Backup parsed");
    Ok(items.iter().map(|item| normalize_backup(item, now)).collect())
}
