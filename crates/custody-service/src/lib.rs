//! # custody-service
//!
//! Configuration and the boundary façade of the document custody engine.
//!
//! [`Custodian`] wires the file-backed registry and ledger, the filesystem
//! content store and the TOML clearance authority together according to a
//! [`CustodyConfig`], and exposes the boundary operations:
//!
//! | operation | method |
//! |---|---|
//! | submit a document | `submit_document` |
//! | verify one document | `request_verification` |
//! | verify every document | `verify_all` |
//! | clearance check | `request_clearance` |
//! | read the ledger | `fetch_ledger` |
//! | read the registry | `fetch_registry` |
//! | check the chain | `check_ledger` |

pub mod config;
pub mod custodian;

pub use config::CustodyConfig;
pub use custodian::Custodian;

// ── Tests ─────────────────────────────────────────────────────────────────────
