//! End-to-end behavior of the assembled checker: suppression semantics,
//! fix convergence, configuration contracts and reporting guarantees.

use serde_json::json;
use stylecheck::{
    check_json, fix_json, Checker, ConfigError, ErrorCollector, Rule, RuleConfigError, RuleError,
    RuleRegistry, ScriptParser, INTERNAL_ERROR_RULE, PARSE_ERROR_RULE,
};

const QUOTED_KEYS_ONLY: &str = r#"{ "disallowQuotedKeysInObjects": true }"#;

fn checked(source: &str, config: &str) -> ErrorCollector {
    check_json(source, config).expect("valid config")
}

#[test]
fn fix_is_idempotent_once_converged() {
    let source = "if(a) {\n    b();\n\n\n    c();\n}";
    let config = r#"{ "preset": "recommended" }"#;

    let once = fix_json(source, config).expect("fix converges");
    assert_eq!(once.output, "if (a) {\n    b();\n\n    c();\n}\n");
    assert!(once.errors.is_empty());

    let twice = fix_json(&once.output, config).expect("fix converges");
    assert_eq!(twice.output, once.output);
}

#[test]
fn blanket_disable_suppresses_everything_after_it() {
    let source = "//stylecheck:disable\nvar x = { \"a\": 1 };";
    assert!(checked(source, QUOTED_KEYS_ONLY).is_empty());
}

#[test]
fn enabling_an_unrelated_rule_does_not_un_suppress() {
    let source = "//stylecheck:disable\n//stylecheck:enable someRuleName\n\tvar x = { \"a\": 1 }";
    assert!(checked(source, QUOTED_KEYS_ONLY).is_empty());
}

#[test]
fn enabling_the_firing_rule_un_suppresses_it() {
    let source =
        "//stylecheck:disable\n//stylecheck:enable disallowQuotedKeysInObjects\nvar x = { \"a\": 1 };";
    let errors = checked(source, QUOTED_KEYS_ONLY);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.error_list()[0].rule, "disallowQuotedKeysInObjects");
}

#[test]
fn suppressed_violations_are_not_fixed() {
    let source = "//stylecheck:disable\nvar x = { \"a\": 1 };\n";
    let fixed = fix_json(source, QUOTED_KEYS_ONLY).expect("fix converges");
    assert_eq!(fixed.output, source);
}

#[test]
fn add_validates_the_line_number() {
    let mut errors = ErrorCollector::new("var x;");
    assert!(errors.add("msg", 0, 0).is_err());
    assert!(errors.is_empty());

    errors.add("msg", 1, 0).expect("valid location");
    let violation = &errors.error_list()[0];
    assert_eq!((violation.line, violation.column), (1, 0));
    assert_eq!(violation.message, "msg");
}

struct AlwaysBroken;

impl Rule for AlwaysBroken {
    fn option_name(&self) -> &'static str {
        "alwaysBroken"
    }
    fn configure(&mut self, _value: &serde_json::Value) -> Result<(), RuleConfigError> {
        Ok(())
    }
    fn check(
        &self,
        _file: &stylecheck::SourceFile,
        _errors: &mut ErrorCollector,
    ) -> Result<(), RuleError> {
        Err(RuleError::Internal("synthetic failure".to_string()))
    }
}

struct ReportsFirstToken;

impl Rule for ReportsFirstToken {
    fn option_name(&self) -> &'static str {
        "reportsFirstToken"
    }
    fn configure(&mut self, _value: &serde_json::Value) -> Result<(), RuleConfigError> {
        Ok(())
    }
    fn check(
        &self,
        file: &stylecheck::SourceFile,
        errors: &mut ErrorCollector,
    ) -> Result<(), RuleError> {
        if let Some(token) = file.tokens().first() {
            errors.add("first token", token.start.line, token.start.column)?;
        }
        Ok(())
    }
}

#[test]
fn one_broken_rule_does_not_silence_the_others() {
    let mut registry = RuleRegistry::new();
    registry.register(|| Box::new(AlwaysBroken));
    registry.register(|| Box::new(ReportsFirstToken));
    let mut checker = Checker::new(registry, ScriptParser::new());
    checker
        .configure_json(&json!({ "alwaysBroken": true, "reportsFirstToken": true }).to_string())
        .expect("valid config");

    let errors = checker.check_string("var x = 1;");
    let rules: Vec<_> = errors.error_list().iter().map(|v| v.rule.as_str()).collect();
    assert_eq!(rules, [INTERNAL_ERROR_RULE, "reportsFirstToken"]);
    assert!(errors.error_list()[0].message.contains("alwaysBroken"));
}

#[test]
fn explanation_of_a_tab_indented_line_carries_no_tabs() {
    let errors = checked("\tvar x = { \"a\": 1 }", QUOTED_KEYS_ONLY);
    assert_eq!(errors.len(), 1);
    let violation = &errors.error_list()[0];
    assert_eq!(violation.rule, "disallowQuotedKeysInObjects");

    let rendered = errors.explain(violation);
    assert!(!rendered.contains('\t'));
    assert!(rendered.contains("Extra quotes for key"));
}

#[test]
fn check_output_is_byte_deterministic() {
    let source = "if(a) {\n\n\n\tb();\n}";
    let config = r#"{ "preset": "strict" }"#;
    let first = serde_json::to_string(checked(source, config).error_list()).expect("serialize");
    let second = serde_json::to_string(checked(source, config).error_list()).expect("serialize");
    assert_eq!(first, second);
}

#[test]
fn user_options_override_the_expanded_preset() {
    let long_line = format!("var x = \"{}\";\n", "a".repeat(120));
    let with_preset = checked(&long_line, r#"{ "preset": "strict" }"#);
    assert!(with_preset
        .error_list()
        .iter()
        .any(|v| v.rule == "maximumLineLength"));

    let relaxed = checked(
        &long_line,
        r#"{ "preset": "strict", "maximumLineLength": 200 }"#,
    );
    assert!(relaxed.is_empty());
}

#[test]
fn snake_case_keys_fail_with_a_converted_suggestion() {
    let err = check_json("var x;", r#"{ "disallow_quoted_keys_in_objects": true }"#)
        .expect_err("should reject snake_case");
    match err {
        ConfigError::NotCamelCase { suggested } => {
            assert!(suggested.contains("disallowQuotedKeysInObjects"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unparseable_input_yields_one_sentinel_even_under_suppression() {
    let errors = checked("//stylecheck:disable\nvar x = ;", QUOTED_KEYS_ONLY);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.error_list()[0].rule, PARSE_ERROR_RULE);
}

#[test]
fn fixing_unparseable_input_returns_the_check_outcome() {
    let fixed = fix_json("var x = ;", QUOTED_KEYS_ONLY).expect("not a fix failure");
    assert_eq!(fixed.output, "var x = ;");
    assert_eq!(fixed.errors.error_list()[0].rule, PARSE_ERROR_RULE);
}
