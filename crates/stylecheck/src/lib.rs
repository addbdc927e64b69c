//! # stylecheck
//!
//! Pluggable static style checker: parse once, run configured rules over
//! the tokens and AST, honor inline suppression directives, and optionally
//! apply declared fixes until the source reaches a fixed point.
//!
//! This facade wires the engine (`stylecheck-core`) to the bundled script
//! frontend (`stylecheck-script`) and the built-in rules
//! (`stylecheck-rules`). For custom rules or frontends, build a
//! [`Checker`] directly over your own [`RuleRegistry`] and [`Parser`].
//!
//! ```
//! let source = "var point = { \"x\": 1 };\n";
//! let errors = stylecheck::check_json(source, r#"{ "preset": "recommended" }"#)?;
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors.error_list()[0].rule, "disallowQuotedKeysInObjects");
//! # Ok::<(), stylecheck::ConfigError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use serde_json::{Map, Value};

pub use stylecheck_core::{
    Ast, Checker, ConfigError, ErrorCollector, FixError, FixOutcome, InvalidLocationError,
    LookupError, NodeData, NodeId, NodeKind, ParseError, ParsedFile, Parser, Position, Rule,
    RuleBox, RuleConfigError, RuleError, RuleFactory, RuleRegistry, SourceFile, Span,
    SuppressionIndex, TextEdit, Token, TokenKind, TokenQuery, Violation, ViolationDiagnostic,
    DIRECTIVE_MARKER, INTERNAL_ERROR_RULE, MAX_FIX_PASSES, PARSE_ERROR_RULE,
};
pub use stylecheck_rules::{default_registry, presets};
pub use stylecheck_script::ScriptParser;

/// Builds a checker over the built-in rules and frontend, configured with
/// `options`.
///
/// # Errors
///
/// [`ConfigError`] if the options are rejected; no checker is returned.
pub fn checker(options: &Map<String, Value>) -> Result<Checker, ConfigError> {
    let mut checker = Checker::new(default_registry(), ScriptParser::new());
    checker.configure(options)?;
    Ok(checker)
}

/// Checks one source string against an options object.
///
/// # Errors
///
/// [`ConfigError`] for a rejected configuration. Parse failures are not
/// errors; they surface as a single `parseError` violation.
pub fn check(source: &str, options: &Map<String, Value>) -> Result<ErrorCollector, ConfigError> {
    Ok(checker(options)?.check_string(source))
}

/// Checks one source string against a JSON configuration string.
///
/// # Errors
///
/// [`ConfigError`] for invalid JSON, a non-object root, or a rejected
/// configuration.
pub fn check_json(source: &str, config: &str) -> Result<ErrorCollector, ConfigError> {
    let value: Value = serde_json::from_str(config)?;
    let Value::Object(map) = value else {
        return Err(ConfigError::NotAnObject);
    };
    check(source, &map)
}

/// Fixes one source string, returning the converged text and the
/// violations that remain.
///
/// # Errors
///
/// [`FixError`] for a rejected configuration, divergence, or a fix batch
/// that breaks parsing.
pub fn fix(source: &str, options: &Map<String, Value>) -> Result<FixOutcome, FixError> {
    checker(options)?.fix_string(source)
}

/// Fixes one source string against a JSON configuration string.
///
/// # Errors
///
/// Same as [`fix`], plus [`ConfigError`] for invalid JSON.
pub fn fix_json(source: &str, config: &str) -> Result<FixOutcome, FixError> {
    let value: Value = serde_json::from_str(config).map_err(ConfigError::from)?;
    let Value::Object(map) = value else {
        return Err(FixError::Config(ConfigError::NotAnObject));
    };
    fix(source, &map)
}
