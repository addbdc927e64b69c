//! Enforces a maximum source line length.

use serde_json::Value;
use stylecheck_core::{ErrorCollector, Rule, RuleConfigError, RuleError, SourceFile};

/// `maximumLineLength`: a positive integer, or `{ "value": n }`.
///
/// An empty object or any unrecognized sub-key is a configure-time error.
/// Measured in characters, not bytes. Not fixable.
#[derive(Debug, Default)]
pub struct MaximumLineLength {
    limit: usize,
}

impl MaximumLineLength {
    fn positive(&self, value: &Value) -> Result<usize, RuleConfigError> {
        value
            .as_u64()
            .filter(|n| *n > 0)
            .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
            .ok_or_else(|| {
                RuleConfigError::unexpected(self.option_name(), "a positive integer", value)
            })
    }
}

impl Rule for MaximumLineLength {
    fn option_name(&self) -> &'static str {
        "maximumLineLength"
    }

    fn configure(&mut self, value: &Value) -> Result<(), RuleConfigError> {
        self.limit = match value {
            Value::Number(_) => self.positive(value)?,
            Value::Object(map) => {
                if let Some(unknown) = map.keys().find(|k| *k != "value") {
                    return Err(RuleConfigError::new(format!(
                        "`{}` does not recognize sub-key `{unknown}`",
                        self.option_name()
                    )));
                }
                let inner = map.get("value").ok_or_else(|| {
                    RuleConfigError::new(format!(
                        "`{}` object form requires a `value` sub-key",
                        self.option_name()
                    ))
                })?;
                self.positive(inner)?
            }
            other => {
                return Err(RuleConfigError::unexpected(
                    self.option_name(),
                    "a positive integer or `{ \"value\": n }`",
                    other,
                ));
            }
        };
        Ok(())
    }

    fn check(&self, file: &SourceFile, errors: &mut ErrorCollector) -> Result<(), RuleError> {
        for (i, line) in file.lines().enumerate() {
            let length = line.chars().count();
            if length > self.limit {
                errors.add(
                    format!("Line must be at most {} characters", self.limit),
                    i + 1,
                    self.limit,
                )?;
            }
        }
        Ok(())
    }
}
