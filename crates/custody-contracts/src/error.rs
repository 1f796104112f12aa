//! Error types for the custody engine.
//!
//! All fallible operations return `CustodyResult<T>`. Every variant carries a
//! human-readable message and maps to a stable machine-readable `kind()`, so
//! callers always receive a structured failure.

use thiserror::Error;

/// The unified error type for the custody engine.
#[derive(Debug, Error)]
pub enum CustodyError {
    /// No document is registered under the given identifier.
    #[error("document '{document_id}' not found in registry")]
    NotFound { document_id: String },

    /// A byte source could not be fully read or written.
    #[error("i/o error: {reason}")]
    Io { reason: String },

    /// A registered document's bytes are absent or unreadable at verification
    /// time. The record's status has been set to `MISSING`.
    #[error("content for document '{document_id}' is missing: {reason}")]
    MissingContent { document_id: String, reason: String },

    /// The clearance authority could not be reached or did not answer in time.
    /// An `INDETERMINATE` decision has been recorded.
    #[error("clearance authority unavailable: {reason}")]
    AuthorityUnavailable { reason: String },

    /// The ledger's hash chain is broken. Reported, never repaired.
    #[error("audit ledger chain broken at index {index}: {reason}")]
    ChainCorruption { index: u64, reason: String },

    /// The registry or ledger could not durably persist a write. Prior state
    /// is left untouched.
    #[error("persistence failed: {reason}")]
    PersistenceFailed { reason: String },

    /// A caller-supplied value was rejected before any state changed.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl CustodyError {
    /// Stable identifier for the failure class, suitable for wire responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Io { .. } => "IO_ERROR",
            Self::MissingContent { .. } => "MISSING_CONTENT",
            Self::AuthorityUnavailable { .. } => "AUTHORITY_UNAVAILABLE",
            Self::ChainCorruption { .. } => "CHAIN_CORRUPTION",
            Self::PersistenceFailed { .. } => "PERSISTENCE_FAILED",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::ConfigError { .. } => "CONFIG_ERROR",
        }
    }
}

impl From<std::io::Error> for CustodyError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { reason: e.to_string() }
    }
}

/// Convenience alias used throughout the custody crates.
pub type CustodyResult<T> = Result<T, CustodyError>;
