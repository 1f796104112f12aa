//! Test doubles for the seam traits.

use std::{
    io::{Cursor, Read},
    sync::Mutex,
    thread,
    time::Duration,
};

use chrono::{DateTime, Utc};
use serde_json::Value;

use custody_contracts::{
    clearance::AuthorityVerdict,
    document::{DocumentId, DocumentRecord, DocumentStatus},
    error::{CustodyError, CustodyResult},
    ledger::{ChainReport, EventType, LedgerEntry},
};

use crate::traits::{AuditLedger, ClearanceAuthority, ContentStore, DocumentRegistry};

/// Vec-backed registry with sequential ids.
#[derive(Default)]
pub struct MockRegistry {
    records: Mutex<Vec<DocumentRecord>>,
}

impl DocumentRegistry for MockRegistry {
    fn register(
        &self,
        filename: &str,
        storage_location: &str,
        fingerprint: &str,
        algorithm: &str,
    ) -> CustodyResult<DocumentId> {
        let mut records = self.records.lock().unwrap();
        let id = DocumentId::new(format!("DOC-test-{}", records.len()));
        records.push(DocumentRecord {
            document_id: id.clone(),
            filename: filename.to_string(),
            storage_location: storage_location.to_string(),
            fingerprint: fingerprint.to_string(),
            algorithm: algorithm.to_string(),
            registered_at: Utc::now(),
            last_verified: None,
            status: DocumentStatus::Registered,
        });
        Ok(id)
    }

    fn get(&self, document_id: &DocumentId) -> CustodyResult<DocumentRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| &r.document_id == document_id)
            .cloned()
            .ok_or_else(|| CustodyError::NotFound { document_id: document_id.to_string() })
    }

    fn list_all(&self) -> CustodyResult<Vec<DocumentRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }

    fn mark_verified(
        &self,
        document_id: &DocumentId,
        status: DocumentStatus,
        verified_at: DateTime<Utc>,
    ) -> CustodyResult<()> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| &r.document_id == document_id)
            .ok_or_else(|| CustodyError::NotFound { document_id: document_id.to_string() })?;
        record.status = status;
        record.last_verified = Some(verified_at);
        Ok(())
    }
}

/// Ledger that records entries without hashing them.
#[derive(Default)]
pub struct MockLedger {
    entries: Mutex<Vec<LedgerEntry>>,
}

impl MockLedger {
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl AuditLedger for MockLedger {
    fn append(&self, event_type: EventType, payload: Value) -> CustodyResult<LedgerEntry> {
        let mut entries = self.entries.lock().unwrap();
        let entry = LedgerEntry {
            index: entries.len() as u64,
            timestamp: Utc::now(),
            event_type,
            payload,
            previous_hash: LedgerEntry::GENESIS_HASH.to_string(),
            entry_hash: String::new(),
        };
        entries.push(entry.clone());
        Ok(entry)
    }

    fn verify_chain(&self) -> CustodyResult<ChainReport> {
        Ok(ChainReport::intact(self.len() as u64))
    }

    fn read_all(&self) -> CustodyResult<Vec<LedgerEntry>> {
        Ok(self.entries())
    }
}

/// Content store whose reads never finish in time.
pub struct SlowContentStore {
    pub delay: Duration,
}

impl ContentStore for SlowContentStore {
    fn put(&self, _filename: &str, _content: &mut dyn Read) -> CustodyResult<String> {
        Ok("slow".to_string())
    }

    fn open(&self, _location: &str) -> CustodyResult<Box<dyn Read + Send>> {
        thread::sleep(self.delay);
        Ok(Box::new(Cursor::new(Vec::new())))
    }
}

/// Authority with a fixed answer.
pub struct FixedAuthority {
    pub answer: Result<AuthorityVerdict, String>,
    pub delay: Option<Duration>,
}

impl FixedAuthority {
    pub fn answering(verdict: AuthorityVerdict) -> Self {
        Self { answer: Ok(verdict), delay: None }
    }

    pub fn failing(reason: &str) -> Self {
        Self { answer: Err(reason.to_string()), delay: None }
    }
}

impl ClearanceAuthority for FixedAuthority {
    fn lookup(&self, _user_identity: &str) -> CustodyResult<AuthorityVerdict> {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.answer
            .clone()
            .map_err(|reason| CustodyError::AuthorityUnavailable { reason })
    }
}
