//! The seam between the engine and a language frontend.
//!
//! The engine never parses source text itself. A [`Parser`] implementation
//! (the bundled `stylecheck-script` frontend, or any external one) turns
//! source into the token stream plus AST that the file model is built from.

use crate::ast::Ast;
use crate::token::Token;

/// Output of a successful parse: the AST arena plus the full token list,
/// comments included.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// The syntax tree.
    pub ast: Ast,
    /// All tokens in source order, including comments.
    pub tokens: Vec<Token>,
}

/// Failure to parse source text.
#[derive(Debug, Clone, thiserror::Error)]
#[error("parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
    /// Line of the failure (1-indexed).
    pub line: usize,
    /// Column of the failure (0-indexed).
    pub column: usize,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// A language frontend.
pub trait Parser {
    /// Parses source text into tokens and an AST.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the text is not valid in the frontend's
    /// grammar.
    fn parse(&self, source: &str) -> Result<ParsedFile, ParseError>;
}
