//! Flags unnecessary quotes around object keys.

use serde_json::Value;
use stylecheck_core::{
    ErrorCollector, NodeKind, Rule, RuleConfigError, RuleError, SourceFile, TextEdit,
};
use stylecheck_script::{is_valid_identifier, KEYWORDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    /// Every quoted key that could be written bare is flagged.
    #[default]
    All,
    /// Reserved words may keep their quotes.
    AllButReserved,
}

/// `disallowQuotedKeysInObjects`: `true` or `"allButReserved"`.
///
/// Reports quoted object keys whose inner text is a valid bare key, with a
/// fix that strips the quotes.
#[derive(Debug, Default)]
pub struct DisallowQuotedKeysInObjects {
    mode: Mode,
}

impl Rule for DisallowQuotedKeysInObjects {
    fn option_name(&self) -> &'static str {
        "disallowQuotedKeysInObjects"
    }

    fn configure(&mut self, value: &Value) -> Result<(), RuleConfigError> {
        self.mode = match value {
            Value::Bool(true) => Mode::All,
            Value::String(s) if s == "allButReserved" => Mode::AllButReserved,
            other => {
                return Err(RuleConfigError::unexpected(
                    self.option_name(),
                    "`true` or `\"allButReserved\"`",
                    other,
                ));
            }
        };
        Ok(())
    }

    fn check(&self, file: &SourceFile, errors: &mut ErrorCollector) -> Result<(), RuleError> {
        let ast = file.ast();
        for &property in file.nodes_of_kind(NodeKind::Property) {
            let key = ast.children(property)[0];
            let data = ast.node(key);
            if data.kind != NodeKind::StringLiteral {
                continue;
            }
            let Some(quoted) = &data.text else {
                continue;
            };
            if quoted.len() < 2 {
                continue;
            }
            let inner = &quoted[1..quoted.len() - 1];

            let reserved = KEYWORDS.contains(&inner);
            let removable = match self.mode {
                Mode::All => is_valid_identifier(inner) || reserved,
                Mode::AllButReserved => is_valid_identifier(inner),
            };
            if !removable {
                continue;
            }

            errors.add_with_fix(
                "Extra quotes for key",
                data.start.line,
                data.start.column,
                TextEdit::replace(data.span.start, data.span.end, inner),
            )?;
        }
        Ok(())
    }
}
