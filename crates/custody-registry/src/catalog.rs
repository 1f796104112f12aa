//! The record set shared by every registry backing.
//!
//! A `Catalog` owns the records in registration order plus an index from
//! identifier to position. It never does I/O; backings decide when a change
//! becomes visible.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use custody_contracts::{
    document::{DocumentId, DocumentRecord, DocumentStatus},
    error::{CustodyError, CustodyResult},
};

/// Build the identifier for the record at registration position `sequence`.
///
/// The position is unique for the life of the registry because records are
/// never removed, so two registrations in the same millisecond still differ.
pub fn allocate_id(registered_at: DateTime<Utc>, sequence: usize) -> DocumentId {
    DocumentId::new(format!("DOC-{}-{}", registered_at.timestamp_millis(), sequence))
}

#[derive(Debug, Default, Clone)]
pub(crate) struct Catalog {
    records: Vec<DocumentRecord>,
    index: HashMap<DocumentId, usize>,
}

impl Catalog {
    /// Rebuild a catalog from persisted records, refusing duplicate ids.
    pub(crate) fn from_records(records: Vec<DocumentRecord>) -> CustodyResult<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if index.insert(record.document_id.clone(), position).is_some() {
                return Err(CustodyError::PersistenceFailed {
                    reason: format!("registry contains duplicate id '{}'", record.document_id),
                });
            }
        }
        Ok(Self { records, index })
    }

    pub(crate) fn records(&self) -> &[DocumentRecord] {
        &self.records
    }

    /// The record the next `register` call would create. Nothing changes
    /// until it is passed to `push`.
    pub(crate) fn draft(
        &self,
        filename: &str,
        storage_location: &str,
        fingerprint: &str,
        algorithm: &str,
    ) -> DocumentRecord {
        let registered_at = Utc::now();
        DocumentRecord {
            document_id: allocate_id(registered_at, self.records.len()),
            filename: filename.to_string(),
            storage_location: storage_location.to_string(),
            fingerprint: fingerprint.to_string(),
            algorithm: algorithm.to_string(),
            registered_at,
            last_verified: None,
            status: DocumentStatus::Registered,
        }
    }

    pub(crate) fn push(&mut self, record: DocumentRecord) {
        self.index.insert(record.document_id.clone(), self.records.len());
        self.records.push(record);
    }

    pub(crate) fn position(&self, document_id: &DocumentId) -> CustodyResult<usize> {
        self.index
            .get(document_id)
            .copied()
            .ok_or_else(|| CustodyError::NotFound { document_id: document_id.to_string() })
    }

    pub(crate) fn get(&self, document_id: &DocumentId) -> CustodyResult<DocumentRecord> {
        Ok(self.records[self.position(document_id)?].clone())
    }

    /// Set the two mutable fields of the record at `position`.
    pub(crate) fn set_status(
        &mut self,
        position: usize,
        status: DocumentStatus,
        verified_at: DateTime<Utc>,
    ) {
        let record = &mut self.records[position];
        record.status = status;
        record.last_verified = Some(verified_at);
    }
}
