// MyRent - core/store.rs
//
// Record store abstraction and an in-memory implementation.
//
// The import pipeline, the dashboard and the catalogue operations all take
// a `PropertyStore` handle from their caller; nothing in core or app opens
// a store itself.

use crate::core::model::{PropertyRecord, Status};
use crate::util::error::StoreError;

/// Persistent collection of property records.
pub trait PropertyStore {
    /// Every record, in id order.
    fn scan_all(&self) -> Result<Vec<PropertyRecord>, StoreError>;

    /// Records whose status equals `status`, in id order.
    fn filter_by_status(&self, status: Status) -> Result<Vec<PropertyRecord>, StoreError>;

    /// Address of every record, ordered by address.
    fn addresses(&self) -> Result<Vec<String>, StoreError>;

    /// Insert all `records` or none of them. Returns the assigned ids in
    /// input order. Any id already on a record is ignored.
    fn bulk_insert(&mut self, records: Vec<PropertyRecord>) -> Result<Vec<i64>, StoreError>;

    /// Replace the stored record with the same id.
    fn update(&mut self, record: &PropertyRecord) -> Result<(), StoreError>;

    /// Remove the record with `id`.
    fn delete(&mut self, id: i64) -> Result<(), StoreError>;
}

/// `Vec`-backed store. Ids are assigned from 1 and never reused.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<PropertyRecord>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: i64) -> Result<usize, StoreError> {
        self.records
            .iter()
            .position(|r| r.id == Some(id))
            .ok_or(StoreError::NotFound { id })
    }
}

impl PropertyStore for MemoryStore {
    fn scan_all(&self) -> Result<Vec<PropertyRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn filter_by_status(&self, status: Status) -> Result<Vec<PropertyRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect())
    }

    fn addresses(&self) -> Result<Vec<String>, StoreError> {
        let mut addresses: Vec<String> = self.records.iter().map(|r| r.address.clone()).collect();
        addresses.sort();
        Ok(addresses)
    }

    fn bulk_insert(&mut self, records: Vec<PropertyRecord>) -> Result<Vec<i64>, StoreError> {
        // `Default` leaves next_id at 0; ids still start at 1.
        let first = self.next_id.max(1);
        let mut ids = Vec::with_capacity(records.len());
        for (offset, mut record) in records.into_iter().enumerate() {
            let id = first + offset as i64;
            record.id = Some(id);
            self.records.push(record);
            ids.push(id);
        }
        self.next_id = first + ids.len() as i64;
        Ok(ids)
    }

    fn update(&mut self, record: &PropertyRecord) -> Result<(), StoreError> {
        let id = record.id.ok_or(StoreError::MissingId)?;
        let index = self.position(id)?;
        self.records[index] = record.clone();
        Ok(())
    }

    fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        let index = self.position(id)?;
        self.records.remove(index);
        Ok(())
    }
}
