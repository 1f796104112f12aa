//! Hash-chain primitives: hashing and chain integrity verification.
//!
//! Every field that contributes to an entry's hash is listed explicitly so
//! nothing is accidentally omitted.
//!
//! Hash input layout (bytes, in order):
//!   1. index as 8-byte little-endian
//!   2. timestamp as RFC 3339 with nanoseconds and `Z` suffix
//!   3. event type wire name (e.g. `INTEGRITY_CHECK`)
//!   4. compact JSON of the payload
//!   5. previous_hash as UTF-8 bytes (64 ASCII hex chars)

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};

use custody_contracts::ledger::{ChainReport, EventType, LedgerEntry};

/// Compute the SHA-256 hash for a single ledger entry.
///
/// Returns a lowercase 64-character hex string.
pub fn hash_entry(
    index: u64,
    timestamp: &DateTime<Utc>,
    event_type: EventType,
    payload: &Value,
    previous_hash: &str,
) -> String {
    // `Value`'s Display is compact JSON; object keys come out sorted, so the
    // same payload always yields the same bytes after a disk round trip.
    let payload_json = payload.to_string();

    let mut hasher = Sha256::new();
    hasher.update(index.to_le_bytes());
    hasher.update(timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true).as_bytes());
    hasher.update(event_type.as_str().as_bytes());
    hasher.update(payload_json.as_bytes());
    hasher.update(previous_hash.as_bytes());

    hex::encode(hasher.finalize())
}

/// Recompute the stored hash of `entry` from its own fields.
pub fn recompute(entry: &LedgerEntry) -> String {
    hash_entry(
        entry.index,
        &entry.timestamp,
        entry.event_type,
        &entry.payload,
        &entry.previous_hash,
    )
}

/// Verify the integrity of a hash chain.
///
/// Checks, for every entry in order:
///
/// 1. **Position**: `index` equals the entry's position in the slice.
/// 2. **Linkage**: `previous_hash` equals the preceding entry's
///    `entry_hash` (or `GENESIS_HASH` at position 0).
/// 3. **Hash correctness**: `entry_hash` matches the value recomputed from
///    the entry's own fields.
///
/// Stops at the first failure and reports its position. An empty chain is
/// valid.
pub fn verify_chain(entries: &[LedgerEntry]) -> ChainReport {
    let mut expected_prev: &str = LedgerEntry::GENESIS_HASH;

    for (position, entry) in entries.iter().enumerate() {
        let position = position as u64;

        if entry.index != position
            || entry.previous_hash != expected_prev
            || entry.entry_hash != recompute(entry)
        {
            return ChainReport::broken_at(position);
        }

        expected_prev = entry.entry_hash.as_str();
    }

    ChainReport::intact(entries.len() as u64)
}

/// Build the entry that follows a tail described by `next_index` and
/// `previous_hash`.
pub(crate) fn next_entry(
    next_index: u64,
    previous_hash: &str,
    event_type: EventType,
    payload: Value,
) -> LedgerEntry {
    let timestamp = Utc::now();
    let entry_hash = hash_entry(next_index, &timestamp, event_type, &payload, previous_hash);

    LedgerEntry {
        index: next_index,
        timestamp,
        event_type,
        payload,
        previous_hash: previous_hash.to_string(),
        entry_hash,
    }
}
