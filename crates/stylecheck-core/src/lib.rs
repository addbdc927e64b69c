//! # stylecheck-core
//!
//! Engine of the stylecheck style checker: the file model, the rule
//! contract and registry, the checker (rule runner), inline suppression
//! and the autofix engine.
//!
//! This crate knows nothing about any concrete grammar. A language
//! frontend implements [`Parser`] and hands the engine tokens plus an AST;
//! the bundled frontend lives in `stylecheck-script`, the built-in rules
//! in `stylecheck-rules`.
//!
//! ## Example
//!
//! ```ignore
//! use stylecheck_core::{Checker, RuleRegistry};
//!
//! let mut registry = RuleRegistry::new();
//! registry.register(|| Box::new(MyRule::default()));
//!
//! let mut checker = Checker::new(registry, MyParser);
//! checker.configure_json(r#"{ "myRule": true }"#)?;
//! let errors = checker.check_string(source);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ast;
mod checker;
mod config;
mod errors;
mod file;
mod fixer;
mod parse;
mod registry;
mod rule;
mod suppress;
mod token;

pub use ast::{Ast, NodeData, NodeId, NodeKind};
pub use checker::Checker;
pub use config::{to_camel_case, ConfigError, RESERVED_OPTIONS};
pub use errors::{
    ErrorCollector, InvalidLocationError, TextEdit, Violation, ViolationDiagnostic,
    INTERNAL_ERROR_RULE, PARSE_ERROR_RULE,
};
pub use file::{LookupError, SourceFile, TokenQuery};
pub use fixer::{FixError, FixOutcome, MAX_FIX_PASSES};
pub use parse::{ParseError, ParsedFile, Parser};
pub use registry::{RuleFactory, RuleRegistry};
pub use rule::{Rule, RuleBox, RuleConfigError, RuleError};
pub use suppress::{SuppressionIndex, DIRECTIVE_MARKER};
pub use token::{Position, Span, Token, TokenKind};
