//! Forbids specific keywords outright.

use serde_json::Value;
use stylecheck_core::{ErrorCollector, Rule, RuleConfigError, RuleError, SourceFile, TokenKind};

/// `disallowKeywords`: a non-empty array of keyword strings, e.g.
/// `["with"]`. Not fixable; removing a keyword is never a safe rewrite.
#[derive(Debug, Default)]
pub struct DisallowKeywords {
    keywords: Vec<String>,
}

impl Rule for DisallowKeywords {
    fn option_name(&self) -> &'static str {
        "disallowKeywords"
    }

    fn configure(&mut self, value: &Value) -> Result<(), RuleConfigError> {
        let Value::Array(items) = value else {
            return Err(RuleConfigError::unexpected(
                self.option_name(),
                "a non-empty array of keyword strings",
                value,
            ));
        };
        if items.is_empty() {
            return Err(RuleConfigError::new(format!(
                "`{}` expects at least one keyword",
                self.option_name()
            )));
        }
        self.keywords = items
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
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    fn check(&self, file: &SourceFile, errors: &mut ErrorCollector) -> Result<(), RuleError> {
        let mut hits = Vec::new();
        file.iterate_tokens_by_type(&[TokenKind::Keyword], |token| {
            if self.keywords.iter().any(|k| *k == token.value) {
                hits.push((token.value.clone(), token.start));
            }
        });
        for (keyword, position) in hits {
            errors.add(
                format!("Illegal keyword: `{keyword}`"),
                position.line,
                position.column,
            )?;
        }
        Ok(())
    }
}
