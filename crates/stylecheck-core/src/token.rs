//! Lexical tokens and source positions.

use serde::{Deserialize, Serialize};

/// A position in source text.
///
/// Lines are 1-based and columns are 0-based. The asymmetry follows the
/// convention of the editors and reporters this data is handed to and is
/// preserved everywhere in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (0-indexed).
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A half-open byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns true if `other` lies entirely within this span.
    #[must_use]
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Language keyword (`var`, `if`, `return`, ...).
    Keyword,
    /// Identifier.
    Identifier,
    /// Punctuator (`{`, `(`, `;`, `===`, ...).
    Punctuator,
    /// String literal, including its quotes.
    String,
    /// Numeric literal.
    Number,
    /// `// ...` comment, including the delimiter.
    LineComment,
    /// `/* ... */` comment, including the delimiters.
    BlockComment,
}

impl TokenKind {
    /// Returns true for line and block comments.
    #[must_use]
    pub fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }
}

/// A lexical token.
///
/// Tokens are produced once per file and owned by the file model; rules only
/// ever see shared references. `whitespace_before` holds the raw whitespace
/// text (including newlines) between the previous token and this one, which
/// several rules count line breaks in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Raw source text of the token.
    pub value: String,
    /// Byte range in the source.
    pub range: Span,
    /// Start position.
    pub start: Position,
    /// End position (position just past the last character).
    pub end: Position,
    /// Raw whitespace immediately preceding this token.
    pub whitespace_before: String,
    /// Index of this token in the file's token list.
    pub index: usize,
}

impl Token {
    /// Returns true for line and block comments.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.kind.is_comment()
    }

    /// Number of newlines in the whitespace preceding this token.
    #[must_use]
    pub fn newlines_before(&self) -> usize {
        self.whitespace_before.matches('\n').count()
    }
}
