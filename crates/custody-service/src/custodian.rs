//! The boundary façade.
//!
//! `Custodian` is the single entry point a front end talks to. It owns the
//! four stores behind their traits and the two engines built on them, and
//! exposes one method per boundary operation.

use std::{io::Read, sync::Arc};

use tracing::{info, warn};

use custody_audit::FileLedger;
use custody_clearance::TomlClearanceAuthority;
use custody_contracts::{
    clearance::AccessDecision,
    document::{DocumentId, DocumentRecord, SubmissionReceipt},
    error::{CustodyError, CustodyResult},
    ledger::{ChainReport, LedgerEntry},
    verify::VerificationResult,
};
use custody_core::{
    traits::{AuditLedger, ClearanceAuthority, ContentStore, DocumentRegistry},
    ClearanceEvaluator, FsContentStore, HashingReader, IntegrityVerifier, ALGORITHM,
};
use custody_registry::FileRegistry;

use crate::config::CustodyConfig;

/// Owns the registry, ledger, content store and clearance authority, and
/// routes every boundary operation to the right component.
pub struct Custodian {
    registry: Arc<dyn DocumentRegistry>,
    ledger: Arc<dyn AuditLedger>,
    content: Arc<dyn ContentStore>,
    verifier: IntegrityVerifier,
    evaluator: ClearanceEvaluator,
}

impl Custodian {
    /// Open the file-backed stores named by `config`.
    ///
    /// A ledger whose chain is broken still opens, so the break can be
    /// inspected with `check_ledger`; a ledger with unreadable lines does not.
    pub fn open(config: &CustodyConfig) -> CustodyResult<Self> {
        let registry = FileRegistry::open(config.registry_path())?;
        let ledger = FileLedger::open(config.ledger_path())?;
        let content = FsContentStore::new(config.content_dir())?;

        let authority = match &config.clearance.policy_file {
            Some(path) => TomlClearanceAuthority::from_file(path)?,
            None => {
                warn!("no clearance policy file configured; every identity will be denied");
                TomlClearanceAuthority::deny_all()
            }
        };

        info!(
            data_dir = %config.storage.data_dir.display(),
            content_dir = %config.content_dir().display(),
            "custodian opened"
        );

        let registry: Arc<dyn DocumentRegistry> = Arc::new(registry);
        let ledger: Arc<dyn AuditLedger> = Arc::new(ledger);
        let content: Arc<dyn ContentStore> = Arc::new(content);

        let verifier = IntegrityVerifier::new(
            Arc::clone(&registry),
            Arc::clone(&ledger),
            Arc::clone(&content),
        )
        .with_read_timeout(config.content_read_timeout());
        let evaluator = ClearanceEvaluator::new(Arc::new(authority), Arc::clone(&ledger))
            .with_timeout(config.authority_timeout());

        Ok(Self {
            registry,
            ledger,
            content,
            verifier,
            evaluator,
        })
    }

    /// Assemble a custodian from already-built components, with default
    /// timeouts.
    pub fn from_parts(
        registry: Arc<dyn DocumentRegistry>,
        ledger: Arc<dyn AuditLedger>,
        content: Arc<dyn ContentStore>,
        authority: Arc<dyn ClearanceAuthority>,
    ) -> Self {
        let verifier = IntegrityVerifier::new(
            Arc::clone(&registry),
            Arc::clone(&ledger),
            Arc::clone(&content),
        );
        let evaluator = ClearanceEvaluator::new(authority, Arc::clone(&ledger));

        Self {
            registry,
            ledger,
            content,
            verifier,
            evaluator,
        }
    }

    /// Store `content` under `filename`, fingerprint it and register it.
    ///
    /// The bytes are streamed once: into the content store and through the
    /// fingerprint at the same time.
    pub fn submit_document(
        &self,
        filename: &str,
        content: &mut dyn Read,
    ) -> CustodyResult<SubmissionReceipt> {
        if filename.trim().is_empty() {
            return Err(CustodyError::InvalidInput {
                reason: "filename must not be empty".to_string(),
            });
        }

        let mut hashing = HashingReader::new(content);
        let location = self.content.put(filename, &mut hashing)?;
        let size = hashing.bytes_read();
        let fingerprint = hashing.finish();

        let document_id = self
            .registry
            .register(filename, &location, &fingerprint, ALGORITHM)
            .map_err(|e| {
                warn!(location = %location, error = %e, "registration failed; stored content is orphaned");
                e
            })?;

        info!(document_id = %document_id, filename, bytes = size, "document submitted");

        let record = self.registry.get(&document_id)?;
        Ok(SubmissionReceipt::from(&record))
    }

    pub fn request_verification(&self, document_id: &DocumentId) -> CustodyResult<VerificationResult> {
        self.verifier.verify(document_id)
    }

    pub fn verify_all(&self) -> CustodyResult<Vec<VerificationResult>> {
        self.verifier.verify_all()
    }

    pub fn request_clearance(&self, user_identity: &str) -> CustodyResult<AccessDecision> {
        self.evaluator.evaluate(user_identity)
    }

    pub fn fetch_ledger(&self) -> CustodyResult<Vec<LedgerEntry>> {
        self.ledger.read_all()
    }

    pub fn fetch_registry(&self) -> CustodyResult<Vec<DocumentRecord>> {
        self.registry.list_all()
    }

    /// Verify the ledger chain.
    ///
    /// # Errors
    ///
    /// `ChainCorruption` carrying the first broken index when the chain does
    /// not verify.
    pub fn check_ledger(&self) -> CustodyResult<ChainReport> {
        self.ledger.verify_chain()?.into_result()
    }
}
