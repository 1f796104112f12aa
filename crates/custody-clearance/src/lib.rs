//! # custody-clearance
//!
//! A TOML-driven, deny-by-default clearance authority.
//!
//! ## Overview
//!
//! The custody engine never decides access itself; it asks a
//! [`ClearanceAuthority`](custody_core::traits::ClearanceAuthority) and
//! records the answer. This crate provides [`TomlClearanceAuthority`], which
//! answers from an ordered rule list. The first matching rule wins and an
//! identity no rule mentions is denied.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use custody_clearance::TomlClearanceAuthority;
//!
//! let authority = TomlClearanceAuthority::from_file(Path::new("clearance.toml"))?;
//! // Pass `authority` to `custody_core::ClearanceEvaluator::new(...)`.
//! ```

pub mod authority;
pub mod rule;

pub use authority::TomlClearanceAuthority;
pub use rule::{ClearancePolicy, ClearanceRule, RuleVerdict};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Write;

    use custody_contracts::{clearance::ClearanceLevel, error::CustodyError};
    use custody_core::traits::ClearanceAuthority;

    use crate::TomlClearanceAuthority;

    // ── 1. deny-by-default ────────────────────────────────────────────────────

    /// When no rules exist, every identity must be denied.
    #[test]
    fn test_deny_by_default() {
        let authority = TomlClearanceAuthority::from_toml_str("rules = []").unwrap();
        let verdict = authority.lookup("alice").unwrap();

        assert!(!verdict.granted);
        assert_eq!(verdict.level, None);
        let reason = verdict.reason.unwrap();
        assert!(reason.contains("denied by default"), "unexpected reason: {reason}");
    }

    #[test]
    fn test_empty_document_denies() {
        let authority = TomlClearanceAuthority::from_toml_str("").unwrap();
        assert!(!authority.lookup("anyone").unwrap().granted);
        assert!(!TomlClearanceAuthority::deny_all().lookup("anyone").unwrap().granted);
    }

    // ── 2. explicit grant ─────────────────────────────────────────────────────

    #[test]
    fn test_explicit_grant() {
        let toml = r#"
            [[rules]]
            id = "alice-secret"
            description = "Records officer"
            user = "alice"
            verdict = "grant"
            level = "SECRET"
        "#;

        let authority = TomlClearanceAuthority::from_toml_str(toml).unwrap();
        let verdict = authority.lookup("alice").unwrap();

        assert!(verdict.granted);
        assert_eq!(verdict.level, Some(ClearanceLevel::Secret));
        assert!(!authority.lookup("mallory").unwrap().granted);
    }

    // ── 3. explicit deny ──────────────────────────────────────────────────────

    #[test]
    fn test_explicit_deny() {
        let toml = r#"
            [[rules]]
            id = "suspended"
            user = "bob"
            verdict = "deny"
            deny_reason = "clearance suspended pending review"
        "#;

        let authority = TomlClearanceAuthority::from_toml_str(toml).unwrap();
        let verdict = authority.lookup("bob").unwrap();

        assert!(!verdict.granted);
        assert_eq!(verdict.reason.as_deref(), Some("clearance suspended pending review"));
    }

    // ── 4. wildcard and ordering ──────────────────────────────────────────────

    #[test]
    fn test_wildcard_matches_anyone() {
        let toml = r#"
            [[rules]]
            id = "baseline"
            user = "*"
            verdict = "grant"
            level = "UNCLASSIFIED"
        "#;

        let authority = TomlClearanceAuthority::from_toml_str(toml).unwrap();
        for user in ["alice", "bob", "carol; rm -rf /"] {
            assert_eq!(
                authority.lookup(user).unwrap().level,
                Some(ClearanceLevel::Unclassified),
                "wildcard must match '{user}'"
            );
        }
    }

    /// The first matching rule decides, even if a later rule is more specific.
    #[test]
    fn test_first_match_wins() {
        let toml = r#"
            [[rules]]
            id = "carol-top"
            user = "carol"
            verdict = "grant"
            level = "TOP_SECRET"

            [[rules]]
            id = "everyone-else"
            user = "*"
            verdict = "deny"

            [[rules]]
            id = "dave-never-reached"
            user = "dave"
            verdict = "grant"
            level = "CONFIDENTIAL"
        "#;

        let authority = TomlClearanceAuthority::from_toml_str(toml).unwrap();
        assert_eq!(authority.lookup("carol").unwrap().level, Some(ClearanceLevel::TopSecret));

        let dave = authority.lookup("dave").unwrap();
        assert!(!dave.granted);
        assert_eq!(dave.reason.as_deref(), Some("denied by rule 'everyone-else'"));
    }

    // ── 5. configuration errors ───────────────────────────────────────────────

    #[test]
    fn test_toml_parse_error() {
        match TomlClearanceAuthority::from_toml_str("this is not valid toml ][[[") {
            Err(CustodyError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse clearance TOML"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_level_is_config_error() {
        let toml = r#"
            [[rules]]
            id = "bad"
            user = "alice"
            verdict = "grant"
            level = "COSMIC"
        "#;
        assert!(matches!(
            TomlClearanceAuthority::from_toml_str(toml),
            Err(CustodyError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_grant_without_level_is_config_error() {
        let toml = r#"
            [[rules]]
            id = "levelless"
            user = "alice"
            verdict = "grant"
        "#;
        match TomlClearanceAuthority::from_toml_str(toml) {
            Err(CustodyError::ConfigError { reason }) => assert!(reason.contains("levelless")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[rules]]\nid = \"a\"\nuser = \"alice\"\nverdict = \"grant\"\nlevel = \"CONFIDENTIAL\""
        )
        .unwrap();

        let authority = TomlClearanceAuthority::from_file(file.path()).unwrap();
        assert_eq!(authority.policy().rules.len(), 1);
        assert_eq!(authority.lookup("alice").unwrap().level, Some(ClearanceLevel::Confidential));

        let missing = file.path().with_extension("absent");
        assert!(matches!(
            TomlClearanceAuthority::from_file(&missing),
            Err(CustodyError::ConfigError { .. })
        ));
    }
}
