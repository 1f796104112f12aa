//! # custody-registry
//!
//! The fingerprint registry: a durable catalog mapping each `DocumentId` to
//! the fingerprint recorded when the document was uploaded.
//!
//! Two backings implement `custody_core::traits::DocumentRegistry`:
//!
//! - `InMemoryRegistry` for tests and ephemeral runs
//! - `FileRegistry`, a JSON snapshot replaced atomically on every write
//!
//! Both allocate identifiers as `DOC-<unix-millis>-<sequence>` inside the
//! same critical section that stores the record, so concurrent registrations
//! can never collide.

mod catalog;
pub mod file;
pub mod memory;

pub use catalog::allocate_id;
pub use file::FileRegistry;
pub use memory::InMemoryRegistry;

// ── Tests ─────────────────────────────────────────────────────────────────────
