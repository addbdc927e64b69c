//! Requires whitespace between a keyword and the token that follows it.

use serde_json::Value;
use stylecheck_core::{
    ErrorCollector, Rule, RuleConfigError, RuleError, SourceFile, TextEdit, TokenKind, TokenQuery,
};

/// Keywords checked when the option is `true`.
const DEFAULT_KEYWORDS: &[&str] = &[
    "do", "for", "if", "else", "switch", "case", "try", "catch", "while", "return", "function",
    "typeof",
];

/// `requireSpaceAfterKeywords`: `true` (default keyword set) or an array of
/// keyword strings.
///
/// Reports keywords glued to the next token, e.g. `if(x)`. A trailing
/// semicolon is exempt so `return;` stays legal. Fixable (insert a space).
#[derive(Debug, Default)]
pub struct RequireSpaceAfterKeywords {
    keywords: Vec<String>,
}

impl Rule for RequireSpaceAfterKeywords {
    fn option_name(&self) -> &'static str {
        "requireSpaceAfterKeywords"
    }

    fn configure(&mut self, value: &Value) -> Result<(), RuleConfigError> {
        self.keywords = match value {
            Value::Bool(true) => DEFAULT_KEYWORDS.iter().map(ToString::to_string).collect(),
            Value::Array(items) if !items.is_empty() => items
                .iter()
                .map(|item| {
                    item.as_str().map(ToString::to_string).ok_or_else(|| {
                        RuleConfigError::unexpected(
                            self.option_name(),
                            "an array of keyword strings",
                            item,
                        )
                    })
                })
                .collect::<Result<_, _>>()?,
            other => {
                return Err(RuleConfigError::unexpected(
                    self.option_name(),
                    "`true` or a non-empty array of keywords",
                    other,
                ));
            }
        };
        Ok(())
    }

    fn check(&self, file: &SourceFile, errors: &mut ErrorCollector) -> Result<(), RuleError> {
        let mut hits = Vec::new();
        file.iterate_tokens_by_type(&[TokenKind::Keyword], |token| {
            if self.keywords.iter().any(|k| *k == token.value) {
                hits.push(token.index);
            }
        });

        let physically_next = TokenQuery::any().include_comments();
        for index in hits {
            let keyword = &file.tokens()[index];
            let Some(next) = file.next_token(keyword, &physically_next) else {
                continue;
            };
            if !next.whitespace_before.is_empty() || next.value == ";" {
                continue;
            }
            errors.add_with_fix(
                format!("Missing space after `{}` keyword", keyword.value),
                keyword.start.line,
                keyword.start.column,
                TextEdit::insert(keyword.range.end, " "),
            )?;
        }
        Ok(())
    }
}
