//! # custody-contracts
//!
//! Shared data model and error types for the document custody engine.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod clearance;
pub mod document;
pub mod error;
pub mod ledger;
pub mod verify;

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use clearance::{AuthorityVerdict, ClearanceLevel, ClearanceVerdict};
    use document::{DocumentId, DocumentRecord, DocumentStatus, SubmissionReceipt};
    use error::CustodyError;
    use ledger::{AccessDecisionPayload, ChainReport, EventType, IntegrityCheckPayload, LedgerEntry};
    use verify::IntegrityOutcome;

    fn entry(event_type: EventType, payload: serde_json::Value) -> LedgerEntry {
        LedgerEntry {
            index: 3,
            timestamp: Utc::now(),
            event_type,
            payload,
            previous_hash: LedgerEntry::GENESIS_HASH.to_string(),
            entry_hash: String::new(),
        }
    }

    // ── Wire names ───────────────────────────────────────────────────────────

    #[test]
    fn status_and_event_names_are_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&DocumentStatus::Registered).unwrap(), "\"REGISTERED\"");
        assert_eq!(serde_json::to_string(&DocumentStatus::Mismatch).unwrap(), "\"MISMATCH\"");
        assert_eq!(serde_json::to_string(&EventType::IntegrityCheck).unwrap(), "\"INTEGRITY_CHECK\"");
        assert_eq!(serde_json::to_string(&EventType::AccessDecision).unwrap(), "\"ACCESS_DECISION\"");
        assert_eq!(serde_json::to_string(&ClearanceLevel::TopSecret).unwrap(), "\"TOP_SECRET\"");
        assert_eq!(serde_json::to_string(&ClearanceVerdict::Indeterminate).unwrap(), "\"INDETERMINATE\"");
    }

    #[test]
    fn display_matches_serde_name() {
        for status in [
            DocumentStatus::Registered,
            DocumentStatus::Verified,
            DocumentStatus::Mismatch,
            DocumentStatus::Missing,
        ] {
            let wire = serde_json::to_string(&status).unwrap();
            assert_eq!(wire.trim_matches('"'), status.to_string());
        }
        assert_eq!(EventType::IntegrityCheck.to_string(), EventType::IntegrityCheck.as_str());
    }

    #[test]
    fn outcome_maps_to_status() {
        assert_eq!(IntegrityOutcome::Match.status(), DocumentStatus::Verified);
        assert_eq!(IntegrityOutcome::Mismatch.status(), DocumentStatus::Mismatch);
        assert_eq!(IntegrityOutcome::Missing.status(), DocumentStatus::Missing);
    }

    #[test]
    fn clearance_levels_are_ordered() {
        assert!(ClearanceLevel::Unclassified < ClearanceLevel::Confidential);
        assert!(ClearanceLevel::Confidential < ClearanceLevel::Secret);
        assert!(ClearanceLevel::Secret < ClearanceLevel::TopSecret);
    }

    // ── Payload decoding ─────────────────────────────────────────────────────

    #[test]
    fn integrity_payload_decodes_from_entry() {
        let payload = IntegrityCheckPayload {
            document_id: DocumentId::new("DOC-1-0"),
            expected_fingerprint: "aa".to_string(),
            actual_fingerprint: Some("bb".to_string()),
            result: IntegrityOutcome::Mismatch,
            detail: None,
        };
        let e = entry(EventType::IntegrityCheck, serde_json::to_value(&payload).unwrap());
        assert_eq!(e.integrity_payload().unwrap(), payload);
    }

    #[test]
    fn payload_of_wrong_kind_is_rejected() {
        let e = entry(
            EventType::AccessDecision,
            json!({ "user_identity": "alice", "granted_level": null, "verdict": "DENIED" }),
        );
        assert!(e.access_payload().is_ok());
        match e.integrity_payload() {
            Err(CustodyError::InvalidInput { reason }) => {
                assert!(reason.contains("ACCESS_DECISION"), "unexpected reason: {reason}");
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn access_payload_omits_empty_detail() {
        let payload = AccessDecisionPayload {
            user_identity: "bob".to_string(),
            granted_level: Some(ClearanceLevel::Secret),
            verdict: ClearanceVerdict::Granted,
            detail: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("detail").is_none());
        assert_eq!(value["granted_level"], json!("SECRET"));
    }

    // ── Records and reports ──────────────────────────────────────────────────

    #[test]
    fn receipt_copies_immutable_fields() {
        let record = DocumentRecord {
            document_id: DocumentId::new("DOC-42-7"),
            filename: "report.pdf".to_string(),
            storage_location: "loc".to_string(),
            fingerprint: "ff".to_string(),
            algorithm: "SHA-256".to_string(),
            registered_at: Utc::now(),
            last_verified: None,
            status: DocumentStatus::Registered,
        };
        let receipt = SubmissionReceipt::from(&record);
        assert_eq!(receipt.document_id, record.document_id);
        assert_eq!(receipt.fingerprint, "ff");
        assert_eq!(receipt.registered_at, record.registered_at);
    }

    #[test]
    fn broken_report_becomes_chain_corruption() {
        assert!(ChainReport::intact(5).into_result().is_ok());
        match ChainReport::broken_at(2).into_result() {
            Err(CustodyError::ChainCorruption { index, .. }) => assert_eq!(index, 2),
            other => panic!("expected ChainCorruption, got {:?}", other),
        }
    }

    #[test]
    fn authority_verdict_constructors() {
        let granted = AuthorityVerdict::grant(ClearanceLevel::Confidential);
        assert!(granted.granted);
        assert_eq!(granted.level, Some(ClearanceLevel::Confidential));

        let denied = AuthorityVerdict::deny("no rule");
        assert!(!denied.granted);
        assert_eq!(denied.level, None);
    }

    // ── CustodyError ─────────────────────────────────────────────────────────

    #[test]
    fn error_kinds_are_stable() {
        let err = CustodyError::NotFound { document_id: "DOC-9".to_string() };
        assert_eq!(err.kind(), "NOT_FOUND");
        assert!(err.to_string().contains("DOC-9"));

        let err = CustodyError::MissingContent {
            document_id: "DOC-9".to_string(),
            reason: "gone".to_string(),
        };
        assert_eq!(err.kind(), "MISSING_CONTENT");
        assert!(err.to_string().contains("gone"));

        let err = CustodyError::AuthorityUnavailable { reason: "timeout".to_string() };
        assert_eq!(err.kind(), "AUTHORITY_UNAVAILABLE");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CustodyError = io.into();
        assert_eq!(err.kind(), "IO_ERROR");
        assert!(err.to_string().contains("denied"));
    }
}
