//! # stylecheck-script
//!
//! The bundled language frontend: a lexer and recursive-descent parser for
//! a small JavaScript-like script language, exposed to the engine through
//! [`stylecheck_core::Parser`].
//!
//! The token stream keeps comments and verbatim inter-token whitespace, so
//! whitespace- and comment-sensitive rules (and the inline suppression
//! directives) work off real source text rather than a lossy tree.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod lexer;
mod parser;

pub use lexer::KEYWORDS;

use stylecheck_core::{ParseError, ParsedFile, Parser};
use tracing::debug;

use crate::lexer::Lexer;
use crate::parser::ScriptGrammar;

/// Parser for the bundled script language.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptParser;

impl ScriptParser {
    /// Creates the frontend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Parser for ScriptParser {
    fn parse(&self, source: &str) -> Result<ParsedFile, ParseError> {
        let tokens = Lexer::new(source).tokenize()?;
        debug!(tokens = tokens.len(), "tokenized");
        let ast = ScriptGrammar::new(&tokens, source.len()).parse_program()?;
        Ok(ParsedFile { ast, tokens })
    }
}

/// Returns true if `text` is a valid identifier of the script language and
/// not a keyword.
///
/// Used by rules that decide whether a quoted object key could be written
/// bare.
#[must_use]
pub fn is_valid_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    lexer::is_identifier_start(first)
        && chars.all(lexer::is_identifier_part)
        && !KEYWORDS.contains(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylecheck_core::{NodeKind, Position, Span};

    fn parse(source: &str) -> ParsedFile {
        ScriptParser::new().parse(source).expect("should parse")
    }

    #[test]
    fn program_span_covers_first_to_last_token() {
        let parsed = parse("  var x = 1 ;  ");
        let ast = &parsed.ast;
        let root = ast.root().expect("has root");
        let data = ast.node(root);
        assert_eq!(data.kind, NodeKind::Program);
        assert_eq!(data.span, Span::new(2, 13));
        assert_eq!(data.start, Position::new(1, 2));
    }

    #[test]
    fn empty_source_parses_to_empty_program() {
        let parsed = parse("");
        let ast = &parsed.ast;
        let root = ast.root().expect("has root");
        assert_eq!(ast.node(root).kind, NodeKind::Program);
        assert!(ast.children(root).is_empty());
        assert!(parsed.tokens.is_empty());
    }

    #[test]
    fn object_literal_becomes_properties_with_key_value_children() {
        let parsed = parse("var o = { \"a\": 1, b: two };");
        let ast = &parsed.ast;
        let props: Vec<_> = ast
            .node_ids()
            .filter(|id| ast.kind(*id) == NodeKind::Property)
            .collect();
        assert_eq!(props.len(), 2);

        let first = ast.children(props[0]);
        assert_eq!(ast.kind(first[0]), NodeKind::StringLiteral);
        assert_eq!(ast.node(first[0]).text.as_deref(), Some("\"a\""));
        assert_eq!(ast.kind(first[1]), NodeKind::NumberLiteral);

        let second = ast.children(props[1]);
        assert_eq!(ast.kind(second[0]), NodeKind::Identifier);
        assert_eq!(ast.kind(second[1]), NodeKind::Identifier);
    }

    #[test]
    fn grouping_parens_produce_no_node() {
        let bare = parse("x = a + b;");
        let grouped = parse("x = (a + b);");
        let count = |parsed: &ParsedFile| parsed.ast.len();
        assert_eq!(count(&bare), count(&grouped));

        // The parens survive only in the token stream.
        assert!(grouped
            .tokens
            .iter()
            .any(|t| t.value == "(" ));
    }

    #[test]
    fn binary_precedence_nests_multiplication_tighter() {
        let parsed = parse("r = a + b * c;");
        let ast = &parsed.ast;
        let add = ast
            .node_ids()
            .find(|id| {
                ast.kind(*id) == NodeKind::BinaryExpression
                    && ast.node(*id).text.as_deref() == Some("+")
            })
            .expect("has `+` node");
        let right = ast.children(add)[1];
        assert_eq!(ast.kind(right), NodeKind::BinaryExpression);
        assert_eq!(ast.node(right).text.as_deref(), Some("*"));
    }

    #[test]
    fn if_else_and_nested_blocks() {
        let parsed = parse("if (x) { return 1; } else { while (y) z(); }");
        let ast = &parsed.ast;
        let root = ast.root().expect("has root");
        let if_stmt = ast.children(root)[0];
        assert_eq!(ast.kind(if_stmt), NodeKind::IfStatement);
        assert_eq!(ast.children(if_stmt).len(), 3);
        let alternate = ast.children(if_stmt)[2];
        assert_eq!(ast.kind(alternate), NodeKind::BlockStatement);
    }

    #[test]
    fn function_declaration_with_parameters() {
        let parsed = parse("function add(a, b) { return a + b; }");
        let ast = &parsed.ast;
        let root = ast.root().expect("has root");
        let func = ast.children(root)[0];
        assert_eq!(ast.kind(func), NodeKind::FunctionDeclaration);
        let children = ast.children(func);
        // name, two parameters, body
        assert_eq!(children.len(), 4);
        assert_eq!(ast.node(children[0]).text.as_deref(), Some("add"));
        assert_eq!(ast.kind(children[3]), NodeKind::BlockStatement);
    }

    #[test]
    fn member_and_call_chains() {
        let parsed = parse("console.log(a[0], b.c);");
        let ast = &parsed.ast;
        let call = ast
            .node_ids()
            .find(|id| ast.kind(*id) == NodeKind::CallExpression)
            .expect("has call");
        let children = ast.children(call);
        assert_eq!(children.len(), 3);
        assert_eq!(ast.kind(children[0]), NodeKind::MemberExpression);
    }

    #[test]
    fn parent_links_reach_the_root() {
        let parsed = parse("var x = { a: [1, 2] };");
        let ast = &parsed.ast;
        let root = ast.root().expect("has root");
        for id in ast.node_ids() {
            let mut cursor = id;
            while let Some(parent) = ast.parent(cursor) {
                cursor = parent;
            }
            assert_eq!(cursor, root);
        }
    }

    #[test]
    fn syntax_error_reports_line_and_column() {
        let err = ScriptParser::new()
            .parse("var x = ;")
            .expect_err("should fail");
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 8);
    }

    #[test]
    fn unexpected_end_of_input() {
        let err = ScriptParser::new()
            .parse("function f( ")
            .expect_err("should fail");
        assert!(err.message.contains("end of input"));
    }

    #[test]
    fn identifier_validity() {
        assert!(is_valid_identifier("abc"));
        assert!(is_valid_identifier("$x_1"));
        assert!(!is_valid_identifier("1abc"));
        assert!(!is_valid_identifier("a-b"));
        assert!(!is_valid_identifier("var"));
        assert!(!is_valid_identifier(""));
    }
}
