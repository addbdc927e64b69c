//! Scanner for the bundled script language.
//!
//! Produces the token stream the engine's file model is built from: every
//! token records its half-open byte range, start/end positions
//! (1-based line, 0-based column) and the verbatim whitespace that precedes
//! it, comments included.

use stylecheck_core::{ParseError, Position, Span, Token, TokenKind};

/// Words lexed as [`TokenKind::Keyword`].
pub const KEYWORDS: &[&str] = &[
    "break", "case", "catch", "const", "continue", "default", "delete", "do", "else", "false",
    "finally", "for", "function", "if", "in", "instanceof", "let", "new", "null", "of", "return",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with",
];

/// Multi-character punctuators, longest first.
const PUNCTUATORS: &[&str] = &[
    "===", "!==", "=>", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=",
    "{", "}", "(", ")", "[", "]", ";", ",", ".", ":", "?", "+", "-", "*", "/", "%", "<", ">", "=",
    "!", "&", "|", "~", "^",
];

pub(crate) struct Lexer<'s> {
    src: &'s str,
    chars: Vec<(usize, char)>,
    cursor: usize,
    line: usize,
    column: usize,
}

impl<'s> Lexer<'s> {
    pub(crate) fn new(src: &'s str) -> Self {
        Self {
            src,
            chars: src.char_indices().collect(),
            cursor: 0,
            line: 1,
            column: 0,
        }
    }

    /// Scans the whole source. Whitespace after the final token is dropped.
    pub(crate) fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let whitespace_before = self.consume_whitespace();
            let Some(ch) = self.peek() else {
                break;
            };

            let start_offset = self.offset();
            let start = Position::new(self.line, self.column);

            let kind = match ch {
                '/' if self.peek_at(1) == Some('/') => self.scan_line_comment(),
                '/' if self.peek_at(1) == Some('*') => self.scan_block_comment()?,
                '"' | '\'' => self.scan_string()?,
                c if c.is_ascii_digit() => self.scan_number(),
                c if is_identifier_start(c) => self.scan_word(),
                _ => self.scan_punctuator()?,
            };

            let end_offset = self.offset();
            tokens.push(Token {
                kind,
                value: self.src[start_offset..end_offset].to_string(),
                range: Span::new(start_offset, end_offset),
                start,
                end: Position::new(self.line, self.column),
                whitespace_before,
                index: tokens.len(),
            });
        }
        Ok(tokens)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.cursor)
            .map_or(self.src.len(), |(offset, _)| *offset)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.cursor).map(|(_, c)| *c)
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.cursor + ahead).map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        let (_, c) = *self.chars.get(self.cursor)?;
        self.cursor += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn consume_whitespace(&mut self) -> String {
        let start = self.offset();
        while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n')) {
            self.bump();
        }
        self.src[start..self.offset()].to_string()
    }

    fn scan_line_comment(&mut self) -> TokenKind {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
        TokenKind::LineComment
    }

    fn scan_block_comment(&mut self) -> Result<TokenKind, ParseError> {
        let (line, column) = (self.line, self.column);
        self.bump();
        self.bump();
        loop {
            match self.peek() {
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.bump();
                    self.bump();
                    return Ok(TokenKind::BlockComment);
                }
                Some(_) => {
                    self.bump();
                }
                None => return Err(ParseError::new("unterminated block comment", line, column)),
            }
        }
    }

    fn scan_string(&mut self) -> Result<TokenKind, ParseError> {
        let (line, column) = (self.line, self.column);
        let quote = self.bump().unwrap_or('"');
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.bump();
                    return Ok(TokenKind::String);
                }
                Some('\\') => {
                    self.bump();
                    self.bump();
                }
                Some('\n') | None => {
                    return Err(ParseError::new("unterminated string literal", line, column));
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn scan_number(&mut self) -> TokenKind {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some('.') && matches!(self.peek_at(1), Some(c) if c.is_ascii_digit()) {
            self.bump();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }
        TokenKind::Number
    }

    fn scan_word(&mut self) -> TokenKind {
        let start = self.offset();
        while matches!(self.peek(), Some(c) if is_identifier_part(c)) {
            self.bump();
        }
        let word = &self.src[start..self.offset()];
        if KEYWORDS.contains(&word) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        }
    }

    fn scan_punctuator(&mut self) -> Result<TokenKind, ParseError> {
        for punct in PUNCTUATORS {
            if self.matches_str(punct) {
                for _ in 0..punct.chars().count() {
                    self.bump();
                }
                return Ok(TokenKind::Punctuator);
            }
        }
        let (line, column) = (self.line, self.column);
        let c = self.peek().unwrap_or(' ');
        Err(ParseError::new(
            format!("unexpected character `{c}`"),
            line,
            column,
        ))
    }

    fn matches_str(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }
}

pub(crate) fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

pub(crate) fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}
