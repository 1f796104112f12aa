//! Integrity verification result types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{DocumentId, DocumentStatus};

/// What recomputing a document's fingerprint found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrityOutcome {
    /// Content is unchanged since registration.
    Match,
    /// Content differs from what was registered.
    Mismatch,
    /// Content could not be read.
    Missing,
}

impl IntegrityOutcome {
    /// The registry status a document takes after this outcome.
    pub fn status(&self) -> DocumentStatus {
        match self {
            Self::Match => DocumentStatus::Verified,
            Self::Mismatch => DocumentStatus::Mismatch,
            Self::Missing => DocumentStatus::Missing,
        }
    }
}

impl fmt::Display for IntegrityOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Match => "MATCH",
            Self::Mismatch => "MISMATCH",
            Self::Missing => "MISSING",
        };
        f.write_str(s)
    }
}

/// Returned by the integrity verifier for every completed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub document_id: DocumentId,
    pub outcome: IntegrityOutcome,
    pub expected_fingerprint: String,
    pub actual_fingerprint: Option<String>,
    pub verified_at: DateTime<Utc>,
    /// Index of the ledger entry that records this check.
    pub ledger_index: u64,
}
