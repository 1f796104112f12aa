//! Core trait definitions for the custody engine.
//!
//! These four traits are the seams between the engine and its stores:
//!
//! - `DocumentRegistry`: durable catalog of registered fingerprints
//! - `AuditLedger`: append-only, hash-chained event log
//! - `ContentStore`: byte-addressable storage of uploaded files
//! - `ClearanceAuthority`: external source of access verdicts
//!
//! The verifier and the clearance evaluator only ever talk to these traits,
//! so any backing (in-memory, file, database) can be swapped in.

use std::io::Read;

use chrono::{DateTime, Utc};
use serde_json::Value;

use custody_contracts::{
    clearance::AuthorityVerdict,
    document::{DocumentId, DocumentRecord, DocumentStatus},
    error::CustodyResult,
    ledger::{ChainReport, EventType, LedgerEntry},
};

/// The fingerprint registry.
///
/// Implementations must serialize `register` so that two concurrent calls
/// never allocate the same identifier, and must either persist a write in
/// full or fail without changing observable state.
pub trait DocumentRegistry: Send + Sync {
    /// Allocate a new identifier and persist a record with status
    /// `REGISTERED`.
    fn register(
        &self,
        filename: &str,
        storage_location: &str,
        fingerprint: &str,
        algorithm: &str,
    ) -> CustodyResult<DocumentId>;

    /// Fetch one record, or `CustodyError::NotFound`.
    fn get(&self, document_id: &DocumentId) -> CustodyResult<DocumentRecord>;

    /// All records in registration order.
    fn list_all(&self) -> CustodyResult<Vec<DocumentRecord>>;

    /// Update `status` and `last_verified` of an existing record. The only
    /// mutation a record ever sees.
    fn mark_verified(
        &self,
        document_id: &DocumentId,
        status: DocumentStatus,
        verified_at: DateTime<Utc>,
    ) -> CustodyResult<()>;
}

/// The audit ledger: the immutable record of every check and decision.
///
/// `append` must read the tail, compute the next entry and persist it as one
/// atomic step with respect to other appends.
pub trait AuditLedger: Send + Sync {
    /// Append one event and return the stored entry.
    fn append(&self, event_type: EventType, payload: Value) -> CustodyResult<LedgerEntry>;

    /// Recompute every entry hash and check linkage.
    fn verify_chain(&self) -> CustodyResult<ChainReport>;

    /// Every entry, index 0 first.
    fn read_all(&self) -> CustodyResult<Vec<LedgerEntry>>;
}

/// Storage for document bytes, keyed by an opaque location string.
pub trait ContentStore: Send + Sync {
    /// Stream `content` into the store and return where it landed.
    fn put(&self, filename: &str, content: &mut dyn Read) -> CustodyResult<String>;

    /// Open the bytes stored at `location` for reading.
    fn open(&self, location: &str) -> CustodyResult<Box<dyn Read + Send>>;
}

/// The external clearance authority.
///
/// The engine never interprets policy itself; it asks, records the answer,
/// and passes it on.
pub trait ClearanceAuthority: Send + Sync {
    /// Look up the verdict for `user_identity`. An `Err` means the authority
    /// could not answer, not that access was denied.
    fn lookup(&self, user_identity: &str) -> CustodyResult<AuthorityVerdict>;
}
