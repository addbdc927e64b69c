//! # stylecheck-rules
//!
//! The built-in rules and presets: one module per rule, each implementing
//! [`stylecheck_core::Rule`] over the bundled script frontend's tokens and
//! AST, plus [`default_registry`] wiring them all up.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod disallow_keywords;
mod disallow_multiple_line_breaks;
mod disallow_quoted_keys_in_objects;
mod maximum_line_length;
pub mod presets;
mod require_line_feed_at_file_end;
mod require_space_after_keywords;

pub use disallow_keywords::DisallowKeywords;
pub use disallow_multiple_line_breaks::DisallowMultipleLineBreaks;
pub use disallow_quoted_keys_in_objects::DisallowQuotedKeysInObjects;
pub use maximum_line_length::MaximumLineLength;
pub use require_line_feed_at_file_end::RequireLineFeedAtFileEnd;
pub use require_space_after_keywords::RequireSpaceAfterKeywords;

use stylecheck_core::RuleRegistry;

/// Builds the registry of every built-in rule plus the `recommended` and
/// `strict` presets.
///
/// Registration order fixes the order rules run in.
#[must_use]
pub fn default_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    registry.register(|| Box::<DisallowQuotedKeysInObjects>::default());
    registry.register(|| Box::<RequireSpaceAfterKeywords>::default());
    registry.register(|| Box::<DisallowMultipleLineBreaks>::default());
    registry.register(|| Box::<DisallowKeywords>::default());
    registry.register(|| Box::<MaximumLineLength>::default());
    registry.register(|| Box::<RequireLineFeedAtFileEnd>::default());
    registry.register_preset("recommended", presets::recommended());
    registry.register_preset("strict", presets::strict());
    registry
}
