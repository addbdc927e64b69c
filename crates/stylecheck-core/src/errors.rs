//! Violation collection for one check pass.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};

use crate::file::offset_in;

/// Sentinel rule name for a source that failed to parse.
pub const PARSE_ERROR_RULE: &str = "parseError";

/// Sentinel rule name for a rule whose check failed internally.
pub const INTERNAL_ERROR_RULE: &str = "internalError";

/// A violation was reported at an impossible source location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid violation location: line {line} (lines are 1-indexed)")]
pub struct InvalidLocationError {
    /// The rejected line number.
    pub line: usize,
    /// The column that accompanied it.
    pub column: usize,
}

/// A single text replacement declared by a rule as the fix for its
/// violation. Applied by the autofix engine, never by the rule itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    /// Half-open byte range to replace.
    pub start: usize,
    /// End of the range (exclusive).
    pub end: usize,
    /// Replacement text.
    pub text: String,
}

impl TextEdit {
    /// Creates a replacement edit.
    #[must_use]
    pub fn replace(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Creates a pure insertion at `offset`.
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::replace(offset, offset, text)
    }
}

/// A reported style violation.
///
/// Never mutated after creation; the suppression engine may only remove it
/// from the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Name of the originating rule, or one of the sentinels
    /// [`PARSE_ERROR_RULE`] / [`INTERNAL_ERROR_RULE`].
    pub rule: String,
    /// Human-readable message.
    pub message: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (0-indexed).
    pub column: usize,
    /// Optional fix, applied only by the autofix engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<TextEdit>,
}

impl Violation {
    /// Returns true for the parse/internal error sentinels, which are never
    /// suppressible.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.rule == PARSE_ERROR_RULE || self.rule == INTERNAL_ERROR_RULE
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: [{}] {}",
            self.line, self.column, self.rule, self.message
        )
    }
}

/// Converts a violation to a miette diagnostic for rich display by
/// reporters.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[label("{rule}")]
    span: SourceSpan,
    rule: String,
}

/// Accumulates the violations of one file/check pass.
///
/// Exclusively owned by the pass in progress and discarded after reporting.
#[derive(Debug, Clone)]
pub struct ErrorCollector {
    source: String,
    current_rule: String,
    list: Vec<Violation>,
}

impl ErrorCollector {
    /// Creates an empty collector for one file's source text.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            current_rule: String::new(),
            list: Vec::new(),
        }
    }

    /// Scopes subsequent [`add`](Self::add) calls to `rule`.
    ///
    /// Called by the checker immediately before each rule's check; not
    /// exposed to rules.
    pub(crate) fn set_current_rule(&mut self, rule: &str) {
        self.current_rule = rule.to_string();
    }

    /// Adds a violation at the given location, tagged with the current rule.
    ///
    /// # Errors
    ///
    /// [`InvalidLocationError`] if `line < 1`. Columns are 0-indexed and
    /// typed `usize`, so non-numeric or negative columns are rejected at
    /// compile time.
    pub fn add(
        &mut self,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Result<(), InvalidLocationError> {
        self.push(message, line, column, None)
    }

    /// Adds a violation carrying a fix descriptor.
    ///
    /// # Errors
    ///
    /// Same contract as [`add`](Self::add).
    pub fn add_with_fix(
        &mut self,
        message: impl Into<String>,
        line: usize,
        column: usize,
        fix: TextEdit,
    ) -> Result<(), InvalidLocationError> {
        self.push(message, line, column, Some(fix))
    }

    fn push(
        &mut self,
        message: impl Into<String>,
        line: usize,
        column: usize,
        fix: Option<TextEdit>,
    ) -> Result<(), InvalidLocationError> {
        if line == 0 {
            return Err(InvalidLocationError { line, column });
        }
        self.list.push(Violation {
            rule: self.current_rule.clone(),
            message: message.into(),
            line,
            column,
            fix,
        });
        Ok(())
    }

    /// Records the single parse-failure sentinel for this file.
    pub(crate) fn add_parse_error(&mut self, message: impl Into<String>, line: usize, column: usize) {
        self.list.push(Violation {
            rule: PARSE_ERROR_RULE.to_string(),
            message: message.into(),
            line: line.max(1),
            column,
            fix: None,
        });
    }

    /// Records an internal-failure sentinel naming the offending rule.
    pub(crate) fn add_internal_error(&mut self, rule: &str, message: impl Into<String>) {
        self.list.push(Violation {
            rule: INTERNAL_ERROR_RULE.to_string(),
            message: format!("rule `{rule}` failed: {}", message.into()),
            line: 1,
            column: 0,
            fix: None,
        });
    }

    /// Violations in the order they were added (stable).
    #[must_use]
    pub fn error_list(&self) -> &[Violation] {
        &self.list
    }

    /// Removes every violation for which `predicate` returns false.
    pub fn filter<F: FnMut(&Violation) -> bool>(&mut self, predicate: F) {
        self.list.retain(predicate);
    }

    /// True iff no violations remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Renders a violation with its source line and a caret under the
    /// column. Tabs in the rendered line are normalized to single spaces so
    /// the caret stays aligned and the output carries no raw tab characters.
    #[must_use]
    pub fn explain(&self, violation: &Violation) -> String {
        let line_text = self
            .source
            .split('\n')
            .nth(violation.line.saturating_sub(1))
            .unwrap_or("")
            .replace('\t', " ");
        // Columns count characters, so clamp in characters too.
        let caret_at = violation.column.min(line_text.chars().count());
        format!(
            "{rule}: line {line}, column {column}: {message}\n{text}\n{pad}^",
            rule = violation.rule,
            line = violation.line,
            column = violation.column,
            message = violation.message,
            text = line_text,
            pad = " ".repeat(caret_at),
        )
    }

    /// Converts a violation into a miette diagnostic with a source span.
    #[must_use]
    pub fn to_diagnostic(&self, violation: &Violation) -> ViolationDiagnostic {
        let offset = offset_in(&self.source, violation.line, violation.column);
        ViolationDiagnostic {
            message: violation.message.clone(),
            span: SourceSpan::from((offset, 1)),
            rule: violation.rule.clone(),
        }
    }
}
