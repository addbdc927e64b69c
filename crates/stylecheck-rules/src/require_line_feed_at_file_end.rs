//! Requires a trailing newline at the end of the file.

use serde_json::Value;
use stylecheck_core::{
    ErrorCollector, Rule, RuleConfigError, RuleError, SourceFile, TextEdit,
};

/// `requireLineFeedAtFileEnd`: `true`. Fixable (append a newline).
///
/// An empty file passes; there is no last line to terminate.
#[derive(Debug, Default)]
pub struct RequireLineFeedAtFileEnd;

impl Rule for RequireLineFeedAtFileEnd {
    fn option_name(&self) -> &'static str {
        "requireLineFeedAtFileEnd"
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
        let source = file.source();
        if source.is_empty() || source.ends_with('\n') {
            return Ok(());
        }
        let last_line = source.split('\n').count();
        let last_column = source.split('\n').next_back().unwrap_or("").chars().count();
        errors.add_with_fix(
            "Missing line feed at file end",
            last_line,
            last_column,
            TextEdit::insert(source.len(), "\n"),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stylecheck_core::{Checker, RuleRegistry};
    use stylecheck_script::ScriptParser;

    fn checker() -> Checker {
        let mut registry = RuleRegistry::new();
        registry.register(|| Box::<RequireLineFeedAtFileEnd>::default());
        let mut checker = Checker::new(registry, ScriptParser::new());
        checker
            .configure_json(&json!({ "requireLineFeedAtFileEnd": true }).to_string())
            .expect("valid config");
        checker
    }

    #[test]
    fn missing_newline_is_flagged_at_the_last_position() {
        let errors = checker().check_string("var a = 1;\nvar b = 2;");
        assert_eq!(errors.len(), 1);
        let violation = &errors.error_list()[0];
        assert_eq!((violation.line, violation.column), (2, 10));
    }

    #[test]
    fn terminated_and_empty_files_pass() {
        assert!(checker().check_string("var a = 1;\n").is_empty());
        assert!(checker().check_string("").is_empty());
    }

    #[test]
    fn fix_appends_a_newline_once() {
        let fixed = checker().fix_string("var a = 1;").expect("fix converges");
        assert_eq!(fixed.output, "var a = 1;\n");
        let again = checker().fix_string(&fixed.output).expect("idempotent");
        assert_eq!(again.output, fixed.output);
    }

    #[test]
    fn rejects_non_true_values() {
        let mut rule = RequireLineFeedAtFileEnd;
        assert!(rule.configure(&json!(false)).is_err());
        assert!(rule.configure(&json!("always")).is_err());
    }
}
