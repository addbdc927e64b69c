//! Inline enable/disable directives.
//!
//! Comments of the form
//!
//! ```text
//! // stylecheck: disable ruleA, ruleB
//! /* stylecheck: enable */
//! ```
//!
//! toggle suppression from the directive's position onward. An omitted rule
//! list means "all rules". Keywords are matched case-insensitively with
//! liberal whitespace; blank list entries (stray commas) are ignored.

use std::collections::HashMap;

use tracing::debug;

use crate::errors::ErrorCollector;
use crate::token::Token;

/// Marker word a directive comment must begin with.
pub const DIRECTIVE_MARKER: &str = "stylecheck";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    Disable,
    Enable,
}

/// One directive occurrence: position, polarity and the named rules
/// (`None` = all rules).
#[derive(Debug, Clone)]
struct DirectiveEvent {
    line: usize,
    column: usize,
    polarity: Polarity,
    rules: Option<Vec<String>>,
}

/// Per-file suppression state, computed once from the comment tokens.
#[derive(Debug, Clone, Default)]
pub struct SuppressionIndex {
    events: Vec<DirectiveEvent>,
}

impl SuppressionIndex {
    /// Scans the token stream's comments for directives.
    #[must_use]
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut events = Vec::new();
        for token in tokens.iter().filter(|t| t.is_comment()) {
            if let Some((polarity, rules)) = parse_directive(&token.value) {
                debug!(
                    line = token.start.line,
                    column = token.start.column,
                    ?polarity,
                    ?rules,
                    "suppression directive"
                );
                events.push(DirectiveEvent {
                    line: token.start.line,
                    column: token.start.column,
                    polarity,
                    rules,
                });
            }
        }
        events.sort_by_key(|e| (e.line, e.column));
        Self { events }
    }

    /// Whether a violation from `rule` at the given position is suppressed.
    ///
    /// Directives apply strictly left to right; an explicit per-rule entry
    /// always wins over the blanket default, and later directives win over
    /// earlier ones for exactly the rules they name.
    #[must_use]
    pub fn is_suppressed(&self, rule: &str, line: usize, column: usize) -> bool {
        let mut default_suppressed = false;
        let mut explicit: HashMap<&str, bool> = HashMap::new();

        for event in &self.events {
            if (event.line, event.column) > (line, column) {
                break;
            }
            let suppressed = event.polarity == Polarity::Disable;
            match &event.rules {
                None => {
                    default_suppressed = suppressed;
                    explicit.clear();
                }
                Some(rules) => {
                    for name in rules {
                        explicit.insert(name.as_str(), suppressed);
                    }
                }
            }
        }

        explicit.get(rule).copied().unwrap_or(default_suppressed)
    }

    /// Removes suppressed violations from the collector.
    ///
    /// Parse and internal error sentinels are never suppressible.
    pub fn apply(&self, errors: &mut ErrorCollector) {
        if self.events.is_empty() {
            return;
        }
        errors.filter(|v| v.is_sentinel() || !self.is_suppressed(&v.rule, v.line, v.column));
    }
}

/// Parses a directive from raw comment text (delimiters included).
/// Returns `None` for ordinary comments.
fn parse_directive(comment: &str) -> Option<(Polarity, Option<Vec<String>>)> {
    let body = strip_comment_delimiters(comment).trim();

    let rest = strip_prefix_ignore_case(body, DIRECTIVE_MARKER)?;
    let rest = rest.trim_start();
    let rest = rest.strip_prefix(':')?.trim_start();

    let (keyword, tail) = match rest.find(char::is_whitespace) {
        Some(at) => rest.split_at(at),
        None => (rest, ""),
    };
    let polarity = if keyword.eq_ignore_ascii_case("disable") {
        Polarity::Disable
    } else if keyword.eq_ignore_ascii_case("enable") {
        Polarity::Enable
    } else {
        return None;
    };

    let rules: Vec<String> = tail
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    Some((polarity, if rules.is_empty() { None } else { Some(rules) }))
}

fn strip_comment_delimiters(comment: &str) -> &str {
    if let Some(rest) = comment.strip_prefix("//") {
        rest
    } else if let Some(rest) = comment.strip_prefix("/*") {
        rest.strip_suffix("*/").unwrap_or(rest)
    } else {
        comment
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Position, Span, TokenKind};

    fn comment(value: &str, line: usize, index: usize) -> Token {
        Token {
            kind: TokenKind::LineComment,
            value: value.to_string(),
            range: Span::new(line * 100, line * 100 + value.len()),
            start: Position::new(line, 0),
            end: Position::new(line, value.len()),
            whitespace_before: String::new(),
            index,
        }
    }

    #[test]
    fn parses_blanket_and_listed_directives() {
        assert_eq!(
            parse_directive("//stylecheck:disable"),
            Some((Polarity::Disable, None))
        );
        assert_eq!(
            parse_directive("/* STYLECHECK : disable */"),
            Some((Polarity::Disable, None))
        );
        let parsed = parse_directive("// stylecheck: ENABLE ruleA , ruleB, ");
        assert_eq!(
            parsed,
            Some((
                Polarity::Enable,
                Some(vec!["ruleA".to_string(), "ruleB".to_string()])
            ))
        );
    }

    #[test]
    fn ignores_ordinary_comments() {
        assert_eq!(parse_directive("// just a note"), None);
        assert_eq!(parse_directive("// stylecheck: disallow"), None);
    }

    #[test]
    fn blanket_disable_suppresses_everything_after() {
        let index = SuppressionIndex::from_tokens(&[comment("//stylecheck:disable", 1, 0)]);
        assert!(index.is_suppressed("anyRule", 2, 0));
        // Before the directive nothing is suppressed.
        let early = SuppressionIndex::from_tokens(&[comment("//stylecheck:disable", 5, 0)]);
        assert!(!early.is_suppressed("anyRule", 2, 0));
    }

    #[test]
    fn specific_enable_overrides_blanket_disable() {
        let index = SuppressionIndex::from_tokens(&[
            comment("//stylecheck:disable", 1, 0),
            comment("//stylecheck:enable ruleX", 2, 1),
        ]);
        assert!(!index.is_suppressed("ruleX", 3, 0));
        assert!(index.is_suppressed("ruleY", 3, 0));
    }

    #[test]
    fn enabling_an_unrelated_rule_keeps_others_suppressed() {
        let index = SuppressionIndex::from_tokens(&[
            comment("//stylecheck:disable", 1, 0),
            comment("//stylecheck:enable someRuleName", 2, 1),
        ]);
        assert!(index.is_suppressed("disallowQuotedKeysInObjects", 3, 0));
    }

    #[test]
    fn blanket_directive_resets_explicit_entries() {
        let index = SuppressionIndex::from_tokens(&[
            comment("//stylecheck:disable ruleX", 1, 0),
            comment("//stylecheck:enable", 2, 1),
        ]);
        assert!(!index.is_suppressed("ruleX", 3, 0));
    }

    #[test]
    fn apply_never_removes_sentinels() {
        let mut errors = ErrorCollector::new("");
        errors.set_current_rule("ruleX");
        errors.add("styled", 2, 0).expect("valid");
        errors.add_parse_error("broken", 2, 0);

        let index = SuppressionIndex::from_tokens(&[comment("//stylecheck:disable", 1, 0)]);
        index.apply(&mut errors);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.error_list()[0].rule, crate::errors::PARSE_ERROR_RULE);
    }
}
