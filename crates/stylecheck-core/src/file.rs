//! The file model: single source of truth for one parsed file.
//!
//! Every rule queries source structure through [`SourceFile`], never through
//! raw frontend output. The model bridges the node/token duality: rule
//! *conditions* are naturally expressed over the AST while spacing and
//! parenthesization checks are about tokens, so both live here behind one
//! set of lookup primitives.

use std::collections::HashMap;

use crate::ast::{Ast, NodeId, NodeKind};
use crate::parse::ParsedFile;
use crate::token::{Token, TokenKind};

/// A node/token boundary lookup that found no exactly aligned token.
///
/// This does not happen for well-formed frontend output; it signals a
/// mismatch between the AST spans and the token stream.
#[derive(Debug, Clone, thiserror::Error)]
#[error("no token aligned at byte offset {offset} ({boundary} of a {kind:?} node)")]
pub struct LookupError {
    /// The offset no token aligned with.
    pub offset: usize,
    /// Which node boundary was queried (`"start"` or `"end"`).
    pub boundary: &'static str,
    /// Kind of the node being resolved.
    pub kind: NodeKind,
}

/// Filter for directional token navigation.
///
/// By default comments are skipped and the first remaining token matches.
#[derive(Debug, Clone, Default)]
pub struct TokenQuery {
    kind: Option<TokenKind>,
    value: Option<String>,
    include_comments: bool,
}

impl TokenQuery {
    /// Matches any non-comment token.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Restricts matches to one token kind.
    #[must_use]
    pub fn kind(mut self, kind: TokenKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restricts matches to an exact raw value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Also considers comment tokens (skipped by default).
    #[must_use]
    pub fn include_comments(mut self) -> Self {
        self.include_comments = true;
        self
    }

    fn matches(&self, token: &Token) -> bool {
        if !self.include_comments && token.is_comment() {
            return false;
        }
        if let Some(kind) = self.kind {
            if token.kind != kind {
                return false;
            }
        }
        if let Some(value) = &self.value {
            if token.value != *value {
                return false;
            }
        }
        true
    }

    fn skips(&self, token: &Token) -> bool {
        !self.include_comments && token.is_comment()
    }
}

/// One parsed file: source text, AST, token list and derived indices.
///
/// The indices are built eagerly at construction and never change; a fix
/// pass builds a brand-new `SourceFile` instead of patching them in place.
#[derive(Debug)]
pub struct SourceFile {
    source: String,
    ast: Ast,
    tokens: Vec<Token>,
    nodes_by_kind: HashMap<NodeKind, Vec<NodeId>>,
    tokens_by_kind: HashMap<TokenKind, Vec<usize>>,
}

impl SourceFile {
    /// Builds the file model from frontend output.
    #[must_use]
    pub fn new(source: impl Into<String>, parsed: ParsedFile) -> Self {
        let ParsedFile { ast, tokens } = parsed;

        let mut nodes_by_kind: HashMap<NodeKind, Vec<NodeId>> = HashMap::new();
        for id in ast.node_ids() {
            nodes_by_kind.entry(ast.kind(id)).or_default().push(id);
        }
        for ids in nodes_by_kind.values_mut() {
            ids.sort_by_key(|id| ast.node(*id).span.start);
        }

        let mut tokens_by_kind: HashMap<TokenKind, Vec<usize>> = HashMap::new();
        for token in &tokens {
            tokens_by_kind.entry(token.kind).or_default().push(token.index);
        }

        Self {
            source: source.into(),
            ast,
            tokens,
            nodes_by_kind,
            tokens_by_kind,
        }
    }

    /// The raw source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The syntax tree.
    #[must_use]
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// All tokens in source order, comments included.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Source lines, split on `\n` (final empty segment included when the
    /// file ends with a newline).
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.source.split('\n')
    }

    /// Parent of a node, `None` for the root.
    #[must_use]
    pub fn node_parent(&self, node: NodeId) -> Option<NodeId> {
        self.ast.parent(node)
    }

    /// Node ids of one kind, in source order. Unknown kinds yield an empty
    /// slice, never an error.
    #[must_use]
    pub fn nodes_of_kind(&self, kind: NodeKind) -> &[NodeId] {
        self.nodes_by_kind.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Visits every node whose kind is in `kinds`, in source order.
    pub fn iterate_nodes_by_type<F: FnMut(NodeId)>(&self, kinds: &[NodeKind], mut visit: F) {
        let mut ids: Vec<NodeId> = kinds
            .iter()
            .flat_map(|kind| self.nodes_of_kind(*kind).iter().copied())
            .collect();
        ids.sort_by_key(|id| self.ast.node(*id).span.start);
        for id in ids {
            visit(id);
        }
    }

    /// Visits every token whose kind is in `kinds`, in source order.
    pub fn iterate_tokens_by_type<F: FnMut(&Token)>(&self, kinds: &[TokenKind], mut visit: F) {
        let mut indices: Vec<usize> = kinds
            .iter()
            .flat_map(|kind| {
                self.tokens_by_kind
                    .get(kind)
                    .map_or(&[][..], Vec::as_slice)
                    .iter()
                    .copied()
            })
            .collect();
        indices.sort_unstable();
        for index in indices {
            visit(&self.tokens[index]);
        }
    }

    /// The token starting exactly at the node's start boundary.
    ///
    /// # Errors
    ///
    /// [`LookupError`] if no token aligns, which signals a frontend bug.
    pub fn first_node_token(&self, node: NodeId) -> Result<&Token, LookupError> {
        let data = self.ast.node(node);
        self.token_at_range_start(data.span.start)
            .ok_or(LookupError {
                offset: data.span.start,
                boundary: "start",
                kind: data.kind,
            })
    }

    /// The token ending exactly at the node's end boundary.
    ///
    /// # Errors
    ///
    /// [`LookupError`] if no token aligns, which signals a frontend bug.
    pub fn last_node_token(&self, node: NodeId) -> Result<&Token, LookupError> {
        let data = self.ast.node(node);
        self.token_at_range_end(data.span.end).ok_or(LookupError {
            offset: data.span.end,
            boundary: "end",
            kind: data.kind,
        })
    }

    /// The token whose range starts at the exact byte offset.
    ///
    /// Grouping parentheses are absent from the AST, so rules that care
    /// about literal parenthesization recover it through this lookup.
    #[must_use]
    pub fn token_at_range_start(&self, offset: usize) -> Option<&Token> {
        // Tokens are disjoint and sorted, so starts are strictly increasing.
        let index = self
            .tokens
            .binary_search_by_key(&offset, |t| t.range.start)
            .ok()?;
        Some(&self.tokens[index])
    }

    /// The token whose range ends at the exact byte offset.
    #[must_use]
    pub fn token_at_range_end(&self, offset: usize) -> Option<&Token> {
        let index = self
            .tokens
            .binary_search_by_key(&offset, |t| t.range.end)
            .ok()?;
        Some(&self.tokens[index])
    }

    /// The next token after `token` matching `query`, or `None` at the end
    /// of the stream.
    #[must_use]
    pub fn next_token(&self, token: &Token, query: &TokenQuery) -> Option<&Token> {
        self.tokens
            .get(token.index + 1..)?
            .iter()
            .find(|t| !query.skips(t) && query.matches(t))
    }

    /// The previous token before `token` matching `query`, or `None` at the
    /// start of the stream.
    #[must_use]
    pub fn prev_token(&self, token: &Token, query: &TokenQuery) -> Option<&Token> {
        self.tokens
            .get(..token.index)?
            .iter()
            .rev()
            .find(|t| !query.skips(t) && query.matches(t))
    }

    /// Byte offset of a (1-indexed line, 0-indexed column) position.
    ///
    /// Positions past the end of a line clamp to the line end; lines past
    /// the end of the file clamp to the file end.
    #[must_use]
    pub fn offset_at(&self, line: usize, column: usize) -> usize {
        offset_in(&self.source, line, column)
    }
}

/// Byte offset of a position inside arbitrary text (see
/// [`SourceFile::offset_at`]).
#[must_use]
pub(crate) fn offset_in(text: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let mut offset = 0;
    for (i, content) in text.split('\n').enumerate() {
        if i + 1 == line {
            return offset + column.min(content.len());
        }
        offset += content.len() + 1;
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Ast;
    use crate::token::{Position, Span};

    fn token(kind: TokenKind, value: &str, start: usize, index: usize, ws: &str) -> Token {
        Token {
            kind,
            value: value.to_string(),
            range: Span::new(start, start + value.len()),
            start: Position::new(1, start),
            end: Position::new(1, start + value.len()),
            whitespace_before: ws.to_string(),
            index,
        }
    }

    /// `var x = 1` with a trailing comment, tokens only (empty tree).
    fn fixture() -> SourceFile {
        let tokens = vec![
            token(TokenKind::Keyword, "var", 0, 0, ""),
            token(TokenKind::Identifier, "x", 4, 1, " "),
            token(TokenKind::Punctuator, "=", 6, 2, " "),
            token(TokenKind::Number, "1", 8, 3, " "),
            token(TokenKind::LineComment, "// c", 10, 4, " "),
        ];
        SourceFile::new(
            "var x = 1 // c",
            ParsedFile {
                ast: Ast::new(),
                tokens,
            },
        )
    }

    #[test]
    fn exact_offset_lookup() {
        let file = fixture();
        assert_eq!(file.token_at_range_start(4).map(|t| t.value.as_str()), Some("x"));
        assert_eq!(file.token_at_range_start(5), None);
        assert_eq!(file.token_at_range_end(9).map(|t| t.value.as_str()), Some("1"));
        assert_eq!(file.token_at_range_end(2), None);
    }

    #[test]
    fn next_token_skips_comments_by_default() {
        let file = fixture();
        let number = file.token_at_range_start(8).expect("number token");
        assert_eq!(file.next_token(number, &TokenQuery::any()), None);
        assert_eq!(
            file.next_token(number, &TokenQuery::any().include_comments())
                .map(|t| t.kind),
            Some(TokenKind::LineComment)
        );
    }

    #[test]
    fn prev_token_with_kind_and_value_filter() {
        let file = fixture();
        let number = file.token_at_range_start(8).expect("number token");
        let keyword = file.prev_token(number, &TokenQuery::any().kind(TokenKind::Keyword));
        assert_eq!(keyword.map(|t| t.value.as_str()), Some("var"));
        assert_eq!(
            file.prev_token(number, &TokenQuery::any().value("let")),
            None
        );
    }

    #[test]
    fn navigation_returns_none_at_boundaries() {
        let file = fixture();
        let first = file.token_at_range_start(0).expect("first token");
        assert_eq!(file.prev_token(first, &TokenQuery::any()), None);
    }

    #[test]
    fn iterate_tokens_by_type_in_source_order() {
        let file = fixture();
        let mut seen = Vec::new();
        file.iterate_tokens_by_type(&[TokenKind::Number, TokenKind::Keyword], |t| {
            seen.push(t.value.clone());
        });
        assert_eq!(seen, ["var", "1"]);
    }

    #[test]
    fn unknown_kind_yields_nothing() {
        let file = fixture();
        let mut count = 0;
        file.iterate_tokens_by_type(&[TokenKind::BlockComment], |_| count += 1);
        assert_eq!(count, 0);
        assert!(file.nodes_of_kind(NodeKind::Property).is_empty());
    }

    #[test]
    fn lines_split_on_newline() {
        let file = SourceFile::new(
            "a\nb\n",
            ParsedFile {
                ast: Ast::new(),
                tokens: Vec::new(),
            },
        );
        assert_eq!(file.lines().collect::<Vec<_>>(), ["a", "b", ""]);
    }

    #[test]
    fn node_parent_mirrors_the_ast() {
        let mut ast = Ast::new();
        let leaf = ast.push(
            NodeKind::Identifier,
            Span::new(0, 1),
            Position::new(1, 0),
            Position::new(1, 1),
            Vec::new(),
            Some("a".to_string()),
        );
        let root = ast.push(
            NodeKind::Program,
            Span::new(0, 1),
            Position::new(1, 0),
            Position::new(1, 1),
            vec![leaf],
            None,
        );
        ast.link_parents(root);
        let file = SourceFile::new(
            "a",
            ParsedFile {
                ast,
                tokens: Vec::new(),
            },
        );
        assert_eq!(file.node_parent(leaf), Some(root));
        assert_eq!(file.node_parent(root), None);
    }

    #[test]
    fn offset_at_clamps() {
        let file = fixture();
        assert_eq!(file.offset_at(1, 4), 4);
        assert_eq!(file.offset_at(1, 999), 14);
        assert_eq!(file.offset_at(9, 0), 14);
    }
}
