//! The clearance evaluator.
//!
//! Asks the external `ClearanceAuthority` for a verdict on a user identity
//! and appends exactly one `ACCESS_DECISION` entry for every attempt:
//! granted, denied, or `INDETERMINATE` when the authority could not answer.
//! The identity is handed to the authority as data and is never interpreted
//! by the engine.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use custody_contracts::{
    clearance::{AccessDecision, AuthorityVerdict, ClearanceLevel, ClearanceVerdict},
    error::{CustodyError, CustodyResult},
    ledger::{AccessDecisionPayload, EventType},
};

use crate::{
    deadline::run_with_timeout,
    traits::{AuditLedger, ClearanceAuthority},
};

/// Default upper bound on one authority lookup.
pub const DEFAULT_AUTHORITY_TIMEOUT: Duration = Duration::from_secs(5);

/// Records clearance decisions obtained from an external authority.
pub struct ClearanceEvaluator {
    authority: Arc<dyn ClearanceAuthority>,
    ledger: Arc<dyn AuditLedger>,
    timeout: Duration,
}

impl ClearanceEvaluator {
    pub fn new(authority: Arc<dyn ClearanceAuthority>, ledger: Arc<dyn AuditLedger>) -> Self {
        Self {
            authority,
            ledger,
            timeout: DEFAULT_AUTHORITY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Obtain and record a clearance decision for `user_identity`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an empty identity; nothing is recorded.
    /// - `AuthorityUnavailable` if the authority failed, timed out, or
    ///   answered with a grant that names no level. An `INDETERMINATE`
    ///   entry has been appended first.
    /// - Any persistence error from the ledger.
    pub fn evaluate(&self, user_identity: &str) -> CustodyResult<AccessDecision> {
        if user_identity.trim().is_empty() {
            return Err(CustodyError::InvalidInput {
                reason: "user identity must not be empty".to_string(),
            });
        }

        debug!(user = %user_identity, "consulting clearance authority");

        match self.consult(user_identity) {
            Ok(AuthorityVerdict { granted: true, level: Some(level), reason }) => {
                self.record(user_identity, ClearanceVerdict::Granted, Some(level), reason)
            }
            Ok(AuthorityVerdict { granted: false, reason, .. }) => {
                self.record(user_identity, ClearanceVerdict::Denied, None, reason)
            }
            Ok(AuthorityVerdict { granted: true, level: None, .. }) => {
                self.record_indeterminate(user_identity, "authority granted access without a clearance level".to_string())
            }
            Err(reason) => self.record_indeterminate(user_identity, reason),
        }
    }

    fn consult(&self, user_identity: &str) -> Result<AuthorityVerdict, String> {
        let authority = Arc::clone(&self.authority);
        let identity = user_identity.to_string();

        match run_with_timeout("clearance", self.timeout, move || authority.lookup(&identity)) {
            Ok(Ok(verdict)) => Ok(verdict),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) => Err(format!("clearance lookup did not complete: {}", e)),
        }
    }

    fn record_indeterminate(&self, user_identity: &str, reason: String) -> CustodyResult<AccessDecision> {
        warn!(user = %user_identity, reason = %reason, "clearance authority unavailable");
        self.record(user_identity, ClearanceVerdict::Indeterminate, None, Some(reason.clone()))?;
        Err(CustodyError::AuthorityUnavailable { reason })
    }

    fn record(
        &self,
        user_identity: &str,
        verdict: ClearanceVerdict,
        granted_level: Option<ClearanceLevel>,
        detail: Option<String>,
    ) -> CustodyResult<AccessDecision> {
        let payload = AccessDecisionPayload {
            user_identity: user_identity.to_string(),
            granted_level,
            verdict,
            detail,
        };
        let payload = serde_json::to_value(&payload).map_err(|e| CustodyError::PersistenceFailed {
            reason: format!("failed to encode access payload: {}", e),
        })?;

        let entry = self.ledger.append(EventType::AccessDecision, payload)?;
        let decided_at: DateTime<Utc> = entry.timestamp;

        info!(
            user = %user_identity,
            verdict = %verdict,
            level = ?granted_level,
            ledger_index = entry.index,
            "access decision recorded"
        );

        Ok(AccessDecision {
            user_identity: user_identity.to_string(),
            verdict,
            granted_level,
            decided_at,
            ledger_index: entry.index,
        })
    }
}
