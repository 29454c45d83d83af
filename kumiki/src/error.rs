//! Error types for rule set resolution.

use thiserror::Error;

use crate::RuleSet;

/// Result type for rule set operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{rules}: {reason}")]
    RuleViolation { rules: RuleSet, reason: String },
    #[error("unknown rule set '{0}' (expected ber, cer or der)")]
    UnknownRuleSet(String),
}

impl Error {
    pub fn rule_violation(rules: RuleSet, reason: impl Into<String>) -> Self {
        Error::RuleViolation {
            rules,
            reason: reason.into(),
        }
    }
}
