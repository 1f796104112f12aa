//! Audit ledger entry types.
//!
//! Each `LedgerEntry` commits to its predecessor through `previous_hash`,
//! forming an append-only chain. Altering any field of a stored entry
//! invalidates its `entry_hash` or the successor's `previous_hash`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    clearance::{ClearanceLevel, ClearanceVerdict},
    document::DocumentId,
    error::{CustodyError, CustodyResult},
    verify::IntegrityOutcome,
};

/// The kind of event a ledger entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    IntegrityCheck,
    AccessDecision,
}

impl EventType {
    /// Wire name, also the byte string that enters the entry hash.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IntegrityCheck => "INTEGRITY_CHECK",
            Self::AccessDecision => "ACCESS_DECISION",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry in the hash-chained audit ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Position in the chain, starting at 0 with no gaps.
    pub index: u64,

    /// Wall-clock time (UTC) the entry was appended.
    pub timestamp: DateTime<Utc>,

    pub event_type: EventType,

    /// Event-specific body. See `IntegrityCheckPayload` and
    /// `AccessDecisionPayload`.
    pub payload: Value,

    /// `entry_hash` of the previous entry, or `GENESIS_HASH` for index 0.
    pub previous_hash: String,

    /// SHA-256 (hex) over index, timestamp, event type, payload and
    /// previous hash.
    pub entry_hash: String,
}

impl LedgerEntry {
    /// The `previous_hash` of the first entry in every ledger.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";

    /// Decode the payload of an `INTEGRITY_CHECK` entry.
    pub fn integrity_payload(&self) -> CustodyResult<IntegrityCheckPayload> {
        self.decode_payload(EventType::IntegrityCheck)
    }

    /// Decode the payload of an `ACCESS_DECISION` entry.
    pub fn access_payload(&self) -> CustodyResult<AccessDecisionPayload> {
        self.decode_payload(EventType::AccessDecision)
    }

    fn decode_payload<T: serde::de::DeserializeOwned>(&self, expected: EventType) -> CustodyResult<T> {
        if self.event_type != expected {
            return Err(CustodyError::InvalidInput {
                reason: format!(
                    "ledger entry {} is {}, not {}",
                    self.index, self.event_type, expected
                ),
            });
        }
        serde_json::from_value(self.payload.clone()).map_err(|e| CustodyError::InvalidInput {
            reason: format!("ledger entry {} has malformed payload: {}", self.index, e),
        })
    }
}

/// Body of an `INTEGRITY_CHECK` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityCheckPayload {
    pub document_id: DocumentId,
    pub expected_fingerprint: String,
    /// Absent when the content could not be read.
    pub actual_fingerprint: Option<String>,
    pub result: IntegrityOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Body of an `ACCESS_DECISION` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecisionPayload {
    pub user_identity: String,
    pub granted_level: Option<ClearanceLevel>,
    pub verdict: ClearanceVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Outcome of recomputing the whole chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainReport {
    pub valid: bool,
    /// First index at which a recomputed hash or the linkage disagreed.
    pub broken_at_index: Option<u64>,
    /// Number of entries examined, including the broken one.
    pub entries_checked: u64,
}

impl ChainReport {
    pub fn intact(entries_checked: u64) -> Self {
        Self {
            valid: true,
            broken_at_index: None,
            entries_checked,
        }
    }

    pub fn broken_at(index: u64) -> Self {
        Self {
            valid: false,
            broken_at_index: Some(index),
            entries_checked: index + 1,
        }
    }

    /// Turn a broken report into `ChainCorruption`.
    pub fn into_result(self) -> CustodyResult<Self> {
        match self.broken_at_index {
            Some(index) => Err(CustodyError::ChainCorruption {
                index,
                reason: "recomputed hash or linkage does not match stored value".to_string(),
            }),
            None => Ok(self),
        }
    }
}
