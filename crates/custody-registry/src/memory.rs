//! In-memory implementation of `DocumentRegistry`.
//!
//! Nothing survives the process. Used by tests and by deployments that only
//! need a registry for the lifetime of one run.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use custody_contracts::{
    document::{DocumentId, DocumentRecord, DocumentStatus},
    error::{CustodyError, CustodyResult},
};
use custody_core::traits::DocumentRegistry;

use crate::catalog::Catalog;

/// A `Mutex`-guarded registry. Clones share the same records.
#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    pub(crate) catalog: Arc<Mutex<Catalog>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CustodyResult<MutexGuard<'_, Catalog>> {
        self.catalog.lock().map_err(|e| CustodyError::PersistenceFailed {
            reason: format!("registry lock poisoned: {}", e),
        })
    }
}

impl DocumentRegistry for InMemoryRegistry {
    fn register(
        &self,
        filename: &str,
        storage_location: &str,
        fingerprint: &str,
        algorithm: &str,
    ) -> CustodyResult<DocumentId> {
        let mut catalog = self.lock()?;
        let record = catalog.draft(filename, storage_location, fingerprint, algorithm);
        let id = record.document_id.clone();
        catalog.push(record);

        info!(document_id = %id, filename, "document registered");
        Ok(id)
    }

    fn get(&self, document_id: &DocumentId) -> CustodyResult<DocumentRecord> {
        self.lock()?.get(document_id)
    }

    fn list_all(&self) -> CustodyResult<Vec<DocumentRecord>> {
        Ok(self.lock()?.records().to_vec())
    }

    fn mark_verified(
        &self,
        document_id: &DocumentId,
        status: DocumentStatus,
        verified_at: DateTime<Utc>,
    ) -> CustodyResult<()> {
        let mut catalog = self.lock()?;
        let position = catalog.position(document_id)?;
        catalog.set_status(position, status, verified_at);

        debug!(document_id = %document_id, status = %status, "document status updated");
        Ok(())
    }
}
