//! Durable, file-backed implementation of `DocumentRegistry`.
//!
//! The registry lives in one JSON snapshot, `{ "documents": [...] }`. Every
//! write serializes the would-be record set, writes it to a temporary file in
//! the same directory, syncs it and renames it over the snapshot. The
//! in-memory view is updated only after the rename succeeded, so a failed
//! write leaves both disk and memory as they were.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use custody_contracts::{
    document::{DocumentId, DocumentRecord, DocumentStatus},
    error::{CustodyError, CustodyResult},
};
use custody_core::traits::DocumentRegistry;

use crate::catalog::Catalog;

#[derive(Deserialize)]
struct Snapshot {
    documents: Vec<DocumentRecord>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    documents: &'a [DocumentRecord],
}

/// A registry persisted as a single, atomically replaced JSON file.
pub struct FileRegistry {
    path: PathBuf,
    dir: PathBuf,
    catalog: Mutex<Catalog>,
}

impl FileRegistry {
    /// Open the snapshot at `path`, or start empty when it does not exist.
    ///
    /// # Errors
    ///
    /// `PersistenceFailed` if the snapshot cannot be read or parsed, or if it
    /// holds the same identifier twice.
    pub fn open(path: impl AsRef<Path>) -> CustodyResult<Self> {
        let path = path.as_ref().to_path_buf();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| persist_err("create registry directory", &dir, e))?;

        let catalog = if path.exists() {
            let bytes = fs::read(&path).map_err(|e| persist_err("read registry", &path, e))?;
            let snapshot: Snapshot =
                serde_json::from_slice(&bytes).map_err(|e| CustodyError::PersistenceFailed {
                    reason: format!("registry snapshot '{}' is unreadable: {}", path.display(), e),
                })?;
            Catalog::from_records(snapshot.documents)?
        } else {
            Catalog::default()
        };

        info!(path = %path.display(), documents = catalog.records().len(), "registry opened");

        Ok(Self {
            path,
            dir,
            catalog: Mutex::new(catalog),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> CustodyResult<MutexGuard<'_, Catalog>> {
        self.catalog.lock().map_err(|e| CustodyError::PersistenceFailed {
            reason: format!("registry lock poisoned: {}", e),
        })
    }

    /// Replace the snapshot with `documents`.
    fn commit(&self, documents: &[DocumentRecord]) -> CustodyResult<()> {
        let bytes = serde_json::to_vec_pretty(&SnapshotRef { documents }).map_err(|e| {
            CustodyError::PersistenceFailed {
                reason: format!("failed to encode registry snapshot: {}", e),
            }
        })?;

        let mut temp =
            NamedTempFile::new_in(&self.dir).map_err(|e| persist_err("stage registry", &self.dir, e))?;
        temp.write_all(&bytes)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| persist_err("write registry", temp.path(), e))?;
        temp.persist(&self.path)
            .map_err(|e| persist_err("replace registry", &self.path, e.error))?;
        Ok(())
    }
}

impl DocumentRegistry for FileRegistry {
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

        let mut next = catalog.records().to_vec();
        next.push(record.clone());
        self.commit(&next)?;
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

        let mut next = catalog.clone();
        next.set_status(position, status, verified_at);
        self.commit(next.records())?;
        *catalog = next;

        debug!(document_id = %document_id, status = %status, "document status updated");
        Ok(())
    }
}

fn persist_err(action: &str, path: &Path, e: std::io::Error) -> CustodyError {
    CustodyError::PersistenceFailed {
        reason: format!("failed to {} '{}': {}", action, path.display(), e),
    }
}
