//! # custody-audit
//!
//! Append-only, SHA-256 hash-chained audit ledger for the document custody
//! engine.
//!
//! ## Overview
//!
//! Every integrity check and access decision is recorded as a `LedgerEntry`
//! that links to the previous entry via its SHA-256 hash. Tampering with any
//! entry, even a single byte of its payload, breaks the chain and is
//! reported by `verify_chain` with the index where it breaks. Detected
//! corruption is never repaired.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use custody_audit::FileLedger;
//! use custody_core::traits::AuditLedger;
//!
//! let ledger = FileLedger::open("custody-data/ledger.jsonl")?;
//! ledger.append(EventType::IntegrityCheck, payload)?;
//! assert!(ledger.verify_chain()?.valid);
//! ```

pub mod chain;
pub mod file;
pub mod memory;

pub use chain::{hash_entry, verify_chain};
pub use file::FileLedger;
pub use memory::InMemoryLedger;

// ── Tests ─────────────────────────────────────────────────────────────────────
