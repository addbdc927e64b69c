//! Flags runs of more than one consecutive blank line.

use serde_json::Value;
use stylecheck_core::{
    ErrorCollector, Rule, RuleConfigError, RuleError, SourceFile, TextEdit,
};

/// `disallowMultipleLineBreaks`: `true`.
///
/// A token preceded by more than two newlines sits below at least two blank
/// lines; the fix collapses the run to a single blank line, keeping the
/// token's indentation. The whitespace after the last token is checked the
/// same way, so blank-line runs at the end of the file are flagged too.
#[derive(Debug, Default)]
pub struct DisallowMultipleLineBreaks;

impl Rule for DisallowMultipleLineBreaks {
    fn option_name(&self) -> &'static str {
        "disallowMultipleLineBreaks"
    }

    fn configure(&mut self, value: &Value) -> Result<(), RuleConfigError> {
        match value {
            Value::Bool(true) => Ok(()),
            other => Err(RuleConfigError::unexpected(
                self.option_name(),
                "`true`",
                other,
            )),
        }
    }

    fn check(&self, file: &SourceFile, errors: &mut ErrorCollector) -> Result<(), RuleError> {
        for token in file.tokens() {
            if token.newlines_before() <= 2 {
                continue;
            }
            let whitespace_start = token.range.start - token.whitespace_before.len();
            let indent = token
                .whitespace_before
                .rsplit('\n')
                .next()
                .unwrap_or_default();
            errors.add_with_fix(
                "Multiple line breaks",
                token.start.line,
                token.start.column,
                TextEdit::replace(
                    whitespace_start,
                    token.range.start,
                    format!("\n\n{indent}"),
                ),
            )?;
        }

        // Trailing whitespace belongs to no token, so the end of the file
        // needs its own scan.
        let tail_start = file.tokens().last().map_or(0, |t| t.range.end);
        let tail = &file.source()[tail_start..];
        if tail.matches('\n').count() > 2 {
            let indent = tail.rsplit('\n').next().unwrap_or_default();
            errors.add_with_fix(
                "Multiple line breaks",
                file.source().split('\n').count(),
                0,
                TextEdit::replace(tail_start, file.source().len(), format!("\n\n{indent}")),
            )?;
        }
        Ok(())
    }
}
