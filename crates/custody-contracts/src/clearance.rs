//! Clearance verdict and decision types.
//!
//! The clearance authority answers with an `AuthorityVerdict`; the evaluator
//! turns that into an `AccessDecision` and records it in the ledger whether
//! access was granted, denied, or could not be determined.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access levels, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClearanceLevel {
    Unclassified,
    Confidential,
    Secret,
    TopSecret,
}

impl fmt::Display for ClearanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unclassified => "UNCLASSIFIED",
            Self::Confidential => "CONFIDENTIAL",
            Self::Secret => "SECRET",
            Self::TopSecret => "TOP_SECRET",
        };
        f.write_str(s)
    }
}

/// The recorded verdict of a clearance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClearanceVerdict {
    Granted,
    Denied,
    /// The authority could not be consulted.
    Indeterminate,
}

impl fmt::Display for ClearanceVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Granted => "GRANTED",
            Self::Denied => "DENIED",
            Self::Indeterminate => "INDETERMINATE",
        };
        f.write_str(s)
    }
}

/// What a clearance authority answers for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityVerdict {
    pub granted: bool,
    /// Level granted. Ignored when `granted` is false.
    pub level: Option<ClearanceLevel>,
    /// Optional explanation, copied into the ledger.
    pub reason: Option<String>,
}

impl AuthorityVerdict {
    pub fn grant(level: ClearanceLevel) -> Self {
        Self {
            granted: true,
            level: Some(level),
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            granted: false,
            level: None,
            reason: Some(reason.into()),
        }
    }
}

/// Returned by the clearance evaluator once the decision is on record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    pub user_identity: String,
    pub verdict: ClearanceVerdict,
    pub granted_level: Option<ClearanceLevel>,
    pub decided_at: DateTime<Utc>,
    /// Index of the ledger entry that records this decision.
    pub ledger_index: u64,
}
