//! The rule runner.
//!
//! Drives one file through `Configuring → Checking(rule…) → Suppressing →
//! Done`. Parse failures and misbehaving rules become sentinel violations
//! (data, not panics) so batch tooling over many files keeps going.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::{resolve, ConfigError, ConfiguredRule};
use crate::errors::ErrorCollector;
use crate::file::SourceFile;
use crate::fixer::{self, FixError, FixOutcome};
use crate::parse::Parser;
use crate::registry::RuleRegistry;
use crate::suppress::SuppressionIndex;

/// Checks source strings against a configured rule set.
pub struct Checker {
    registry: RuleRegistry,
    parser: Box<dyn Parser>,
    configured: Vec<ConfiguredRule>,
}

impl Checker {
    /// Creates a checker over a registry and a language frontend.
    ///
    /// No rules run until [`configure`](Self::configure) succeeds.
    #[must_use]
    pub fn new(registry: RuleRegistry, parser: impl Parser + 'static) -> Self {
        Self {
            registry,
            parser: Box::new(parser),
            configured: Vec::new(),
        }
    }

    /// The rule registry this checker draws from.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Number of rules that will run per file.
    #[must_use]
    pub fn configured_rule_count(&self) -> usize {
        self.configured.len()
    }

    /// Validates and installs a raw options object.
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigError`] synchronously; on error no partial rule
    /// set is installed.
    pub fn configure(&mut self, options: &Map<String, Value>) -> Result<(), ConfigError> {
        let configured = resolve(&self.registry, options)?;
        info!(rules = configured.len(), "configured rule set");
        self.configured = configured;
        Ok(())
    }

    /// Parses and installs a JSON configuration string.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] for invalid JSON, a non-object root, or any
    /// [`configure`](Self::configure) failure.
    pub fn configure_json(&mut self, options: &str) -> Result<(), ConfigError> {
        let value: Value = serde_json::from_str(options)?;
        let Value::Object(map) = value else {
            return Err(ConfigError::NotAnObject);
        };
        self.configure(&map)
    }

    /// Checks one source string and returns its collected violations.
    ///
    /// Deterministic: identical input and configuration always yield an
    /// identically ordered violation list.
    #[must_use]
    pub fn check_string(&self, source: &str) -> ErrorCollector {
        let mut errors = ErrorCollector::new(source);

        let parsed = match self.parser.parse(source) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(line = e.line, column = e.column, "parse failed: {}", e.message);
                errors.add_parse_error(e.message, e.line, e.column);
                return errors;
            }
        };

        let file = SourceFile::new(source, parsed);

        for configured in &self.configured {
            let Some(factory) = self.registry.factory(configured.name) else {
                continue;
            };
            // Fresh instance per file: rules may carry per-file state.
            let mut rule = factory();
            if let Err(e) = rule.configure(&configured.value) {
                // Value was validated at configure time; failing here means
                // the rule is not deterministic about its own options.
                errors.add_internal_error(configured.name, e.to_string());
                continue;
            }

            errors.set_current_rule(configured.name);
            debug!(rule = configured.name, "checking");
            if let Err(e) = rule.check(&file, &mut errors) {
                warn!(rule = configured.name, "rule failed: {e}");
                errors.add_internal_error(configured.name, e.to_string());
            }
        }

        SuppressionIndex::from_tokens(file.tokens()).apply(&mut errors);

        info!(violations = errors.len(), "check complete");
        errors
    }

    /// Applies declared fixes until the source reaches a fixed point.
    ///
    /// # Errors
    ///
    /// [`FixError`] on divergence or when a fix batch breaks parsing; see
    /// the fixer module.
    pub fn fix_string(&self, source: &str) -> Result<FixOutcome, FixError> {
        fixer::run(self, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Ast;
    use crate::errors::{INTERNAL_ERROR_RULE, PARSE_ERROR_RULE};
    use crate::parse::{ParseError, ParsedFile};
    use crate::rule::{Rule, RuleConfigError, RuleError};
    use serde_json::json;

    /// Frontend stub: "bad" fails to parse, everything else is an empty
    /// token stream.
    struct StubParser;

    impl Parser for StubParser {
        fn parse(&self, source: &str) -> Result<ParsedFile, ParseError> {
            if source.contains("bad") {
                return Err(ParseError::new("unexpected token `bad`", 1, 0));
            }
            Ok(ParsedFile {
                ast: Ast::new(),
                tokens: Vec::new(),
            })
        }
    }

    struct AlwaysReports;

    impl Rule for AlwaysReports {
        fn option_name(&self) -> &'static str {
            "alwaysReports"
        }
        fn configure(&mut self, _value: &Value) -> Result<(), RuleConfigError> {
            Ok(())
        }
        fn check(&self, _file: &SourceFile, errors: &mut ErrorCollector) -> Result<(), RuleError> {
            errors.add("reported", 1, 0)?;
            Ok(())
        }
    }

    struct AlwaysFails;

    impl Rule for AlwaysFails {
        fn option_name(&self) -> &'static str {
            "alwaysFails"
        }
        fn configure(&mut self, _value: &Value) -> Result<(), RuleConfigError> {
            Ok(())
        }
        fn check(&self, _file: &SourceFile, _errors: &mut ErrorCollector) -> Result<(), RuleError> {
            Err(RuleError::Internal("synthetic failure".to_string()))
        }
    }

    fn checker() -> Checker {
        let mut registry = RuleRegistry::new();
        registry.register(|| Box::new(AlwaysFails));
        registry.register(|| Box::new(AlwaysReports));
        Checker::new(registry, StubParser)
    }

    #[test]
    fn parse_error_becomes_single_sentinel_and_stops_checking() {
        let mut checker = checker();
        checker
            .configure_json(&json!({ "alwaysReports": true }).to_string())
            .expect("valid config");

        let errors = checker.check_string("bad input");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.error_list()[0].rule, PARSE_ERROR_RULE);
    }

    #[test]
    fn internal_error_is_isolated_per_rule() {
        let mut checker = checker();
        checker
            .configure_json(&json!({ "alwaysFails": true, "alwaysReports": true }).to_string())
            .expect("valid config");

        let errors = checker.check_string("ok");
        let rules: Vec<_> = errors.error_list().iter().map(|v| v.rule.as_str()).collect();
        assert_eq!(rules, [INTERNAL_ERROR_RULE, "alwaysReports"]);
        assert!(errors.error_list()[0].message.contains("alwaysFails"));
    }

    #[test]
    fn configure_rejects_non_object_json() {
        let mut checker = checker();
        let err = checker.configure_json("[1, 2]").expect_err("not an object");
        assert!(matches!(err, ConfigError::NotAnObject));
    }

    #[test]
    fn determinism_across_runs() {
        let mut checker = checker();
        checker
            .configure_json(&json!({ "alwaysFails": true, "alwaysReports": true }).to_string())
            .expect("valid config");

        let a = serde_json::to_string(checker.check_string("ok").error_list()).expect("serialize");
        let b = serde_json::to_string(checker.check_string("ok").error_list()).expect("serialize");
        assert_eq!(a, b);
    }
}
