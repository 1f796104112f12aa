//! In-memory implementation of `AuditLedger`.
//!
//! `InMemoryLedger` keeps all entries in a `Vec` protected by a `Mutex`.
//! It is the reference implementation of the chain discipline and backs
//! tests and ephemeral deployments; `FileLedger` adds durability.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::debug;

use custody_contracts::{
    error::{CustodyError, CustodyResult},
    ledger::{ChainReport, EventType, LedgerEntry},
};
use custody_core::traits::AuditLedger;

use crate::chain::{next_entry, verify_chain};

// ── Internal mutable state ────────────────────────────────────────────────────

/// The mutable interior of an `InMemoryLedger`.
pub(crate) struct InMemoryState {
    /// All entries appended so far, in order.
    pub(crate) entries: Vec<LedgerEntry>,

    /// The `entry_hash` of the last entry, or `GENESIS_HASH` before any
    /// entry has been appended.
    pub(crate) last_hash: String,
}

// ── Public ledger ─────────────────────────────────────────────────────────────

/// An in-memory, append-only ledger backed by a SHA-256 hash chain.
///
/// Clones share the same chain.
#[derive(Clone)]
pub struct InMemoryLedger {
    pub(crate) state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        let state = InMemoryState {
            entries: Vec::new(),
            last_hash: LedgerEntry::GENESIS_HASH.to_string(),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// `entry_hash` of the newest entry, or `GENESIS_HASH` when empty.
    pub fn tail_hash(&self) -> CustodyResult<String> {
        Ok(self.lock()?.last_hash.clone())
    }

    fn lock(&self) -> CustodyResult<std::sync::MutexGuard<'_, InMemoryState>> {
        self.state.lock().map_err(|e| CustodyError::PersistenceFailed {
            reason: format!("ledger state lock poisoned: {}", e),
        })
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLedger for InMemoryLedger {
    /// Append one event to the chain.
    ///
    /// The tail is read, the entry hashed and pushed while the lock is held,
    /// so concurrent appends always get consecutive indices.
    fn append(&self, event_type: EventType, payload: Value) -> CustodyResult<LedgerEntry> {
        let mut state = self.lock()?;

        let entry = next_entry(state.entries.len() as u64, &state.last_hash, event_type, payload);

        state.last_hash = entry.entry_hash.clone();
        state.entries.push(entry.clone());

        debug!(index = entry.index, event_type = %event_type, "ledger entry appended");
        Ok(entry)
    }

    fn verify_chain(&self) -> CustodyResult<ChainReport> {
        let state = self.lock()?;
        Ok(verify_chain(&state.entries))
    }

    fn read_all(&self) -> CustodyResult<Vec<LedgerEntry>> {
        Ok(self.lock()?.entries.clone())
    }
}
