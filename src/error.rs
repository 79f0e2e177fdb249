//! Engine errors
//!
//! Validation itself never fails with an error: a rule that cannot find its
//! field simply does not pass. Everything here is raised while rules are being
//! assembled, loaded or configured.

use thiserror::Error;

/// Result alias used by every fallible engine operation.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The rule cannot be built as configured (no strategy, malformed path, ...).
    #[error("configuration error in rule '{rule}': {reason}")]
    Configuration { rule: String, reason: String },

    #[error("invalid validation expression for rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule '{rule}' references unknown custom validator '{predicate}'")]
    UnknownPredicate { rule: String, predicate: String },

    #[error("invalid value '{value}' for setting {key}")]
    InvalidSetting { key: String, value: String },

    #[error("failed to read rule definitions: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse rule definitions: {0}")]
    Parse(#[from] serde_json::Error),
}

impl EngineError {
    pub fn configuration(rule: &str, reason: &str) -> Self {
        EngineError::Configuration {
            rule: rule.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` for errors caused by how a rule was configured.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EngineError::Configuration { .. }
                | EngineError::InvalidPattern { .. }
                | EngineError::UnknownPredicate { .. }
        )
    }
}
