//! The rule capability trait.

use serde_json::Value;

use crate::errors::{ErrorCollector, InvalidLocationError};
use crate::file::{LookupError, SourceFile};

/// A rule rejected its raw option value at configure time.
///
/// Always fatal: the first such error aborts configuration of the whole
/// rule set before any file is checked.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct RuleConfigError {
    /// Description of the invalid shape.
    pub message: String,
}

impl RuleConfigError {
    /// Creates a configuration error with a descriptive message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Convenience constructor: an unexpected value for an option.
    #[must_use]
    pub fn unexpected(option: &str, expected: &str, got: &Value) -> Self {
        Self::new(format!(
            "`{option}` expects {expected}, got `{got}`"
        ))
    }
}

/// A rule's check failed.
///
/// The checker converts this into a single `internalError` sentinel
/// violation and continues with the next rule, so one misbehaving rule
/// never aborts the whole file's check.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The rule reported a violation at an impossible location.
    #[error(transparent)]
    InvalidLocation(#[from] InvalidLocationError),

    /// A node/token boundary lookup failed (frontend/AST mismatch).
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Any other internal failure.
    #[error("{0}")]
    Internal(String),
}

/// An independent style checker.
///
/// Rules are single-use per check pass: the checker creates a fresh
/// instance per file (rules may carry per-file mutable state during
/// `configure`, never across files).
pub trait Rule {
    /// The camelCase option name this rule is configured under.
    fn option_name(&self) -> &'static str;

    /// Validates and applies the raw option value.
    ///
    /// # Errors
    ///
    /// [`RuleConfigError`] for any structurally invalid value: wrong type,
    /// missing required sub-key, unknown sub-key, empty object.
    fn configure(&mut self, value: &Value) -> Result<(), RuleConfigError>;

    /// Checks one file, reporting findings through `errors`.
    ///
    /// # Errors
    ///
    /// [`RuleError`] for internal failures; recorded as a sentinel
    /// violation by the checker.
    fn check(&self, file: &SourceFile, errors: &mut ErrorCollector) -> Result<(), RuleError>;
}

/// Boxed rule trait object.
pub type RuleBox = Box<dyn Rule>;
