//! # custody-core
//!
//! The integrity and clearance engine of the document custody platform.
//!
//! This crate provides:
//! - The four seam traits (`DocumentRegistry`, `AuditLedger`, `ContentStore`,
//!   `ClearanceAuthority`)
//! - The streaming fingerprint generator
//! - The `IntegrityVerifier` and `ClearanceEvaluator`, which turn every check
//!   and every decision into a ledger entry
//! - Filesystem and in-memory content stores
//!
//! ## Usage
//!
//! ```rust,ignore
//! use custody_core::{IntegrityVerifier, ClearanceEvaluator};
//!
//! let verifier = IntegrityVerifier::new(registry, ledger.clone(), content);
//! let result = verifier.verify(&document_id)?;
//! ```

pub mod clearance;
pub mod content;
pub mod deadline;
pub mod fingerprint;
pub mod traits;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use clearance::ClearanceEvaluator;
pub use content::{FsContentStore, MemoryContentStore};
pub use fingerprint::{fingerprint, fingerprint_bytes, HashingReader, ALGORITHM};
pub use verifier::IntegrityVerifier;
