//! TOML-driven clearance authority.
//!
//! `TomlClearanceAuthority` loads a `ClearancePolicy` from a TOML string or
//! file and implements the `ClearanceAuthority` trait from custody-core.
//!
//! Lookup algorithm:
//!
//! 1. Iterate rules in declaration order.
//! 2. The first rule whose `user` pattern matches decides: `grant` answers
//!    with the rule's level, `deny` with the rule's reason.
//! 3. If no rule matched, deny ("denied by default").

use std::path::Path;

use tracing::{debug, warn};

use custody_contracts::{
    clearance::AuthorityVerdict,
    error::{CustodyError, CustodyResult},
};
use custody_core::traits::ClearanceAuthority;

use crate::rule::{ClearancePolicy, RuleVerdict};

/// A `ClearanceAuthority` that answers from rules declared in TOML.
///
/// ```rust,ignore
/// use custody_clearance::TomlClearanceAuthority;
///
/// let authority = TomlClearanceAuthority::from_file(Path::new("clearance.toml"))?;
/// ```
#[derive(Debug, Default)]
pub struct TomlClearanceAuthority {
    policy: ClearancePolicy,
}

impl TomlClearanceAuthority {
    /// An authority with no rules. Denies everyone.
    pub fn deny_all() -> Self {
        Self::default()
    }

    /// Parse `s` as TOML and build a `TomlClearanceAuthority`.
    ///
    /// Returns `CustodyError::ConfigError` if the TOML is malformed, does not
    /// match `ClearancePolicy`, or contains a `grant` rule without a `level`.
    pub fn from_toml_str(s: &str) -> CustodyResult<Self> {
        let policy: ClearancePolicy = toml::from_str(s).map_err(|e| CustodyError::ConfigError {
            reason: format!("failed to parse clearance TOML: {}", e),
        })?;

        if let Some(rule) = policy
            .rules
            .iter()
            .find(|r| r.verdict == RuleVerdict::Grant && r.level.is_none())
        {
            return Err(CustodyError::ConfigError {
                reason: format!("clearance rule '{}' grants access without a level", rule.id),
            });
        }

        Ok(Self { policy })
    }

    /// Read the file at `path` and parse it as a clearance policy.
    pub fn from_file(path: &Path) -> CustodyResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CustodyError::ConfigError {
            reason: format!("failed to read clearance file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn policy(&self) -> &ClearancePolicy {
        &self.policy
    }
}

impl ClearanceAuthority for TomlClearanceAuthority {
    fn lookup(&self, user_identity: &str) -> CustodyResult<AuthorityVerdict> {
        debug!(user_identity, "looking up clearance");

        let Some(rule) = self.policy.rules.iter().find(|r| r.matches(user_identity)) else {
            warn!(user_identity, "no clearance rule matched; denying by default");
            return Ok(AuthorityVerdict::deny(format!(
                "denied by default: no clearance rule matched user '{}'",
                user_identity
            )));
        };

        debug!(rule_id = %rule.id, user_identity, "clearance rule matched");

        let verdict = match (rule.verdict, rule.level) {
            (RuleVerdict::Grant, Some(level)) => AuthorityVerdict::grant(level),
            (RuleVerdict::Grant, None) => AuthorityVerdict {
                granted: true,
                level: None,
                reason: Some(format!("rule '{}' has no level", rule.id)),
            },
            (RuleVerdict::Deny, _) => AuthorityVerdict::deny(
                rule.deny_reason
                    .clone()
                    .unwrap_or_else(|| format!("denied by rule '{}'", rule.id)),
            ),
        };
        Ok(verdict)
    }
}
