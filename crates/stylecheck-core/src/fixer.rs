//! The autofix engine.
//!
//! Re-runs the full check loop, applying each pass's declared fixes as one
//! batch sorted by descending offset (so earlier edits never invalidate
//! later offsets), re-parsing the edited text into a brand-new file model
//! each time, until no fixable violations remain or the pass cap is hit.

use tracing::{debug, info};

use crate::checker::Checker;
use crate::config::ConfigError;
use crate::errors::{ErrorCollector, TextEdit, PARSE_ERROR_RULE};

/// Hard cap on fix iterations, so two rules fighting over the same text
/// cannot loop forever.
pub const MAX_FIX_PASSES: usize = 10;

/// Result of a converged fix run.
#[derive(Debug)]
pub struct FixOutcome {
    /// The fixed source text.
    pub output: String,
    /// Violations of the last pass only: the unresolved, non-fixable
    /// remainder.
    pub errors: ErrorCollector,
}

/// A fix run that could not complete.
///
/// Fatal for this file's fix operation only; reported distinctly from
/// ordinary violations.
#[derive(Debug, thiserror::Error)]
pub enum FixError {
    /// The configuration was rejected before any fixing started.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Still collecting fixable violations after [`MAX_FIX_PASSES`] passes.
    #[error("fixes did not converge after {passes} passes")]
    Diverged {
        /// Number of passes performed.
        passes: usize,
    },

    /// An applied fix batch produced text that no longer parses. The
    /// engine never emits unparseable output.
    #[error("fixes produced unparseable output at line {line}, column {column}: {message}")]
    Unparseable {
        /// Parse failure message.
        message: String,
        /// Line of the failure (1-indexed).
        line: usize,
        /// Column of the failure (0-indexed).
        column: usize,
    },
}

/// Runs the fix loop for one source string.
pub(crate) fn run(checker: &Checker, source: &str) -> Result<FixOutcome, FixError> {
    let mut text = source.to_string();

    for pass in 0..MAX_FIX_PASSES {
        let errors = checker.check_string(&text);

        if let Some(parse_failure) = errors
            .error_list()
            .iter()
            .find(|v| v.rule == PARSE_ERROR_RULE)
        {
            if pass == 0 {
                // The input never parsed; that is a check outcome, not a
                // fix failure.
                return Ok(FixOutcome {
                    output: text,
                    errors,
                });
            }
            return Err(FixError::Unparseable {
                message: parse_failure.message.clone(),
                line: parse_failure.line,
                column: parse_failure.column,
            });
        }

        // Suppression has already been applied by the check pass, so a
        // suppressed violation's fix is never collected here.
        let edits: Vec<TextEdit> = errors
            .error_list()
            .iter()
            .filter_map(|v| v.fix.clone())
            .collect();

        if edits.is_empty() {
            info!(passes = pass, "fix converged");
            return Ok(FixOutcome {
                output: text,
                errors,
            });
        }

        debug!(pass, fixes = edits.len(), "applying fix batch");
        let next = apply_batch(&text, edits);
        if next == text {
            // Every edit was skipped or a no-op; more passes cannot help.
            return Err(FixError::Diverged { passes: pass + 1 });
        }
        text = next;
    }

    Err(FixError::Diverged {
        passes: MAX_FIX_PASSES,
    })
}

/// Applies one batch of edits, highest offset first. Overlapping or
/// out-of-bounds edits are skipped; the first applied edit wins.
fn apply_batch(text: &str, mut edits: Vec<TextEdit>) -> String {
    edits.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

    let mut out = text.to_string();
    let mut applied_start = usize::MAX;
    for edit in edits {
        if edit.start > edit.end
            || edit.end > out.len()
            || edit.end > applied_start
            || !out.is_char_boundary(edit.start)
            || !out.is_char_boundary(edit.end)
        {
            debug!(start = edit.start, end = edit.end, "skipping inapplicable edit");
            continue;
        }
        out.replace_range(edit.start..edit.end, &edit.text);
        applied_start = edit.start;
    }
    out
}
