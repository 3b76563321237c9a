// MyRent - app/catalogue.rs
//
// Single-record catalogue operations: manual entry, edit, list, delete.
// Every write path recomputes `total_cost` the same way imports do.

use crate::core::model::{PropertyRecord, Status};
use crate::core::store::PropertyStore;
use crate::util::error::StoreError;
use chrono::{DateTime, Utc};

/// Fields a user supplies when entering a listing by hand.
#[derive(Debug, Clone, Default)]
pub struct ManualDraft {
    pub title: String,
    pub address: String,
    pub region: String,
    pub area: f64,
    pub rent_value: f64,
    pub condo_fee: f64,
    pub iptu: f64,
    pub status: Status,
    pub tags: Vec<String>,
    pub notes: String,
    pub listing_url: String,
}

impl ManualDraft {
    fn into_record(self, created_at: DateTime<Utc>) -> PropertyRecord {
        let mut record = PropertyRecord::blank(created_at);
        record.title = self.title;
        record.address = self.address;
        record.region = self.region;
        record.area = self.area;
        record.rent_value = self.rent_value;
        record.condo_fee = self.condo_fee;
        record.iptu = self.iptu;
        record.status = self.status;
        record.notes = self.notes;
        record.listing_url = self.listing_url;
        for tag in self.tags {
            record.push_tag(tag.trim());
        }
        record.recompute_total();
        record
    }
}

/// Insert a hand-entered listing. Returns the stored record.
pub fn add_property<S: PropertyStore + ?Sized>(
    store: &mut S,
    draft: ManualDraft,
) -> Result<PropertyRecord, StoreError> {
    let mut record = draft.into_record(Utc::now());
    let ids = store.bulk_insert(vec![record.clone()])?;
    record.id = ids.first().copied();
    tracing::info!(id = ?record.id, "Property added");
    tracing::debug!(id = ?record.id, address = %record.address, "Added property address");
    Ok(record)
}

/// Save an edited record. `total_cost` is recomputed and the stored
/// `created_at` is kept whatever the edit carries.
pub fn update_property<S: PropertyStore + ?Sized>(
    store: &mut S,
    mut record: PropertyRecord,
) -> Result<PropertyRecord, StoreError> {
    let id = record.id.ok_or(StoreError::MissingId)?;
    let stored = store
        .scan_all()?
        .into_iter()
        .find(|r| r.id == Some(id))
        .ok_or(StoreError::NotFound { id })?;

    record.created_at = stored.created_at;
    record.recompute_total();
    store.update(&record)?;
    tracing::info!(id, "Property updated");
    Ok(record)
}

/// All records, or only those with `status`.
pub fn list_properties<S: PropertyStore + ?Sized>(
    store: &S,
    status: Option<Status>,
) -> Result<Vec<PropertyRecord>, StoreError> {
    match status {
        Some(status) => store.filter_by_status(status),
        None => store.scan_all(),
    }
}

pub fn delete_property<S: PropertyStore + ?Sized>(store: &mut S, id: i64) -> Result<(), StoreError> {
    store.delete(id)?;
    tracing::info!(id, "Property deleted");
    Ok(())
}
