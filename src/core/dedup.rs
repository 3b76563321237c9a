// MyRent - core/dedup.rs
//
// Validity filtering and address-based deduplication of import candidates.

use crate::core::model::PropertyRecord;
use crate::util::constants::PLACEHOLDER_TITLE;
use std::collections::HashSet;

/// A candidate is kept when it has an address, a positive rent, or a real
/// (non-empty, non-placeholder) title. Drops blank spreadsheet trailer rows.
pub fn is_valid_candidate(record: &PropertyRecord) -> bool {
    !record.address.is_empty()
        || record.rent_value > 0.0
        || (!record.title.is_empty() && record.title != PLACEHOLDER_TITLE)
}

/// Set of addresses considered already present.
///
/// Seeded once from a snapshot of the store and grown as candidates are
/// admitted, so repeats inside one batch are caught too. Addresses are
/// compared verbatim; an empty address never takes part.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
    skipped: usize,
}

impl Deduplicator {
    pub fn new<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            seen: existing.into_iter().filter(|a| !a.is_empty()).collect(),
            skipped: 0,
        }
    }

    /// Returns `true` if `record` should be kept, recording its address.
    pub fn admit(&mut self, record: &PropertyRecord) -> bool {
        if record.address.is_empty() {
            return true;
        }
        if self.seen.contains(&record.address) {
            self.skipped += 1;
            return false;
        }
        self.seen.insert(record.address.clone());
        true
    }

    /// Number of candidates rejected so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Result of filtering one batch.
#[derive(Debug, Default)]
pub struct DedupOutcome {
    /// Records to persist, in input order, with ids stripped.
    pub accepted: Vec<PropertyRecord>,
    pub skipped_duplicates: usize,
}

/// Run `candidates` through the deduplicator in input order.
/// Any id carried by a candidate is cleared so the store assigns its own.
pub fn deduplicate(candidates: Vec<PropertyRecord>, dedup: &mut Deduplicator) -> DedupOutcome {
    let accepted = candidates
        .into_iter()
        .filter(|record| dedup.admit(record))
        .map(|mut record| {
            record.id = None;
            record
        })
        .collect();

    DedupOutcome {
        accepted,
        skipped_duplicates: dedup.skipped(),
    }
}
