//! The integrity verifier.
//!
//! Recomputes the fingerprint of a registered document's current bytes,
//! compares it with the registered value, and records the outcome:
//!
//!   Registry::get → ContentStore::open → fingerprint → Ledger::append → Registry::mark_verified
//!
//! Every check that reaches a registered document appends exactly one
//! `INTEGRITY_CHECK` entry, whether the content matched, differed, or could
//! not be read. The ledger entry is written before the registry status so a
//! crash in between leaves the ledger authoritative; the next check brings
//! the status back in line.

use std::{sync::Arc, time::Duration};

use tracing::{debug, info, warn};

use custody_contracts::{
    document::{DocumentId, DocumentRecord},
    error::{CustodyError, CustodyResult},
    ledger::{EventType, IntegrityCheckPayload},
    verify::{IntegrityOutcome, VerificationResult},
};

use crate::{
    deadline::run_with_timeout,
    fingerprint::fingerprint,
    traits::{AuditLedger, ContentStore, DocumentRegistry},
};

/// Default upper bound on reading one document's bytes.
pub const DEFAULT_CONTENT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Verifies registered documents against their stored bytes.
pub struct IntegrityVerifier {
    registry: Arc<dyn DocumentRegistry>,
    ledger: Arc<dyn AuditLedger>,
    content: Arc<dyn ContentStore>,
    read_timeout: Duration,
}

impl IntegrityVerifier {
    pub fn new(
        registry: Arc<dyn DocumentRegistry>,
        ledger: Arc<dyn AuditLedger>,
        content: Arc<dyn ContentStore>,
    ) -> Self {
        Self {
            registry,
            ledger,
            content,
            read_timeout: DEFAULT_CONTENT_READ_TIMEOUT,
        }
    }

    /// Bound how long reading one document may take before it counts as
    /// unreadable.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Verify one document.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the identifier is not registered; nothing is recorded.
    /// - `MissingContent` if the bytes could not be read; a `MISSING` entry
    ///   has been appended and the record marked `MISSING`.
    /// - Any persistence error from the ledger or registry.
    pub fn verify(&self, document_id: &DocumentId) -> CustodyResult<VerificationResult> {
        let record = self.registry.get(document_id)?;
        let (result, unreadable) = self.check(&record)?;

        match unreadable {
            Some(reason) => Err(CustodyError::MissingContent {
                document_id: document_id.to_string(),
                reason,
            }),
            None => Ok(result),
        }
    }

    /// Verify every registered document in registration order.
    ///
    /// Unreadable content shows up as a `MISSING` result rather than
    /// aborting the sweep. Persistence errors abort it.
    pub fn verify_all(&self) -> CustodyResult<Vec<VerificationResult>> {
        let records = self.registry.list_all()?;
        let mut results = Vec::with_capacity(records.len());

        for record in &records {
            let (result, _) = self.check(record)?;
            results.push(result);
        }

        info!(
            documents = results.len(),
            mismatched = results.iter().filter(|r| r.outcome == IntegrityOutcome::Mismatch).count(),
            missing = results.iter().filter(|r| r.outcome == IntegrityOutcome::Missing).count(),
            "verification sweep finished"
        );
        Ok(results)
    }

    /// Run one check and record it. The second value carries the read
    /// failure when the outcome is `MISSING`.
    fn check(&self, record: &DocumentRecord) -> CustodyResult<(VerificationResult, Option<String>)> {
        debug!(document_id = %record.document_id, location = %record.storage_location, "verifying document");

        let (outcome, actual, unreadable) = match self.recompute(record) {
            Ok(actual) if actual == record.fingerprint => (IntegrityOutcome::Match, Some(actual), None),
            Ok(actual) => {
                warn!(
                    document_id = %record.document_id,
                    expected = %record.fingerprint,
                    actual = %actual,
                    "fingerprint mismatch: content changed since registration"
                );
                (IntegrityOutcome::Mismatch, Some(actual), None)
            }
            Err(reason) => {
                warn!(document_id = %record.document_id, reason = %reason, "document content unreadable");
                (IntegrityOutcome::Missing, None, Some(reason))
            }
        };

        let payload = IntegrityCheckPayload {
            document_id: record.document_id.clone(),
            expected_fingerprint: record.fingerprint.clone(),
            actual_fingerprint: actual.clone(),
            result: outcome,
            detail: unreadable.clone(),
        };
        let payload = serde_json::to_value(&payload).map_err(|e| CustodyError::PersistenceFailed {
            reason: format!("failed to encode integrity payload: {}", e),
        })?;

        let entry = self.ledger.append(EventType::IntegrityCheck, payload)?;
        self.registry
            .mark_verified(&record.document_id, outcome.status(), entry.timestamp)?;

        info!(
            document_id = %record.document_id,
            outcome = %outcome,
            ledger_index = entry.index,
            "integrity check recorded"
        );

        let result = VerificationResult {
            document_id: record.document_id.clone(),
            outcome,
            expected_fingerprint: record.fingerprint.clone(),
            actual_fingerprint: actual,
            verified_at: entry.timestamp,
            ledger_index: entry.index,
        };
        Ok((result, unreadable))
    }

    /// Fingerprint the current bytes, bounded by the read timeout.
    fn recompute(&self, record: &DocumentRecord) -> Result<String, String> {
        let content = Arc::clone(&self.content);
        let location = record.storage_location.clone();

        let outcome = run_with_timeout("content-read", self.read_timeout, move || {
            let mut reader = content.open(&location)?;
            fingerprint(&mut reader)
        });

        match outcome {
            Ok(Ok(actual)) => Ok(actual),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) => Err(format!("content read did not complete: {}", e)),
        }
    }
}
