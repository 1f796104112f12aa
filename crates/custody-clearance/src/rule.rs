//! Clearance rule types and configuration schema.
//!
//! A `ClearancePolicy` is deserialized from TOML and holds an ordered list of
//! `ClearanceRule`s. Rules are evaluated in declaration order and the first
//! matching rule wins. If no rule matches, the authority denies by default.

use serde::{Deserialize, Serialize};

use custody_contracts::clearance::ClearanceLevel;

/// The answer a rule gives when it matches.
///
/// Example in TOML:
/// ```toml
/// verdict = "grant"
/// verdict = "deny"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleVerdict {
    Grant,
    Deny,
}

/// A single clearance rule loaded from TOML.
///
/// `user` is either an exact identity (case-sensitive) or `"*"`, which
/// matches any identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearanceRule {
    /// Stable identifier used in log lines and denial reasons.
    pub id: String,

    #[serde(default)]
    pub description: String,

    /// Identity pattern: an exact user name, or `"*"`.
    pub user: String,

    pub verdict: RuleVerdict,

    /// Mandatory when `verdict = "grant"`.
    pub level: Option<ClearanceLevel>,

    /// Recorded with the decision when `verdict = "deny"`.
    pub deny_reason: Option<String>,
}

impl ClearanceRule {
    pub fn matches(&self, user_identity: &str) -> bool {
        self.user == "*" || self.user == user_identity
    }
}

/// The top-level structure deserialized from a TOML clearance file.
///
/// Example:
/// ```toml
/// [[rules]]
/// id = "alice-secret"
/// description = "Records officer"
/// user = "alice"
/// verdict = "grant"
/// level = "SECRET"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClearancePolicy {
    /// Ordered list of rules. First match wins.
    #[serde(default)]
    pub rules: Vec<ClearanceRule>,
}
