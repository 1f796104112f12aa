//! Registry record types.
//!
//! A `DocumentRecord` is created once at upload time and persists for the
//! life of the registry. Only `status` and `last_verified` ever change, and
//! only through the integrity verifier.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a registered document, e.g. `DOC-1718000000000-0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a registered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    /// Registered, never verified.
    Registered,
    /// Last verification recomputed the registered fingerprint.
    Verified,
    /// Last verification found different content.
    Mismatch,
    /// Last verification could not read the stored bytes.
    Missing,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Registered => "REGISTERED",
            Self::Verified => "VERIFIED",
            Self::Mismatch => "MISMATCH",
            Self::Missing => "MISSING",
        };
        f.write_str(s)
    }
}

/// One entry of the fingerprint registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub document_id: DocumentId,
    /// Name supplied by the uploader. Untrusted, stored as-is.
    pub filename: String,
    /// Opaque reference owned by the content store.
    pub storage_location: String,
    /// Lowercase hex digest recorded at registration. Never rewritten.
    pub fingerprint: String,
    /// Identifier of the hash function that produced `fingerprint`.
    pub algorithm: String,
    pub registered_at: DateTime<Utc>,
    /// Time of the most recent verification attempt, if any.
    pub last_verified: Option<DateTime<Utc>>,
    pub status: DocumentStatus,
}

/// What the caller gets back after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub document_id: DocumentId,
    pub fingerprint: String,
    pub algorithm: String,
    pub registered_at: DateTime<Utc>,
}

impl From<&DocumentRecord> for SubmissionReceipt {
    fn from(record: &DocumentRecord) -> Self {
        Self {
            document_id: record.document_id.clone(),
            fingerprint: record.fingerprint.clone(),
            algorithm: record.algorithm.clone(),
            registered_at: record.registered_at,
        }
    }
}
