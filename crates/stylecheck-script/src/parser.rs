//! Recursive-descent parser for the bundled script language.
//!
//! Builds the core AST arena from the lexer's token stream. Comments are
//! carried in the token list but invisible to the grammar. Grouping
//! parentheses consume tokens without producing a node, so a redundantly
//! parenthesized expression is indistinguishable from the bare one in the
//! AST and recoverable only from the token stream.

use stylecheck_core::{Ast, NodeId, NodeKind, ParseError, Position, Span, Token, TokenKind};

pub(crate) struct ScriptGrammar<'t> {
    tokens: Vec<&'t Token>,
    pos: usize,
    ast: Ast,
    source_len: usize,
}

impl<'t> ScriptGrammar<'t> {
    pub(crate) fn new(tokens: &'t [Token], source_len: usize) -> Self {
        Self {
            tokens: tokens.iter().filter(|t| !t.is_comment()).collect(),
            pos: 0,
            ast: Ast::new(),
            source_len,
        }
    }

    pub(crate) fn parse_program(mut self) -> Result<Ast, ParseError> {
        let mut statements = Vec::new();
        while self.peek().is_some() {
            statements.push(self.statement()?);
        }

        let (span, start, end) = if self.tokens.is_empty() {
            (Span::new(0, self.source_len), Position::new(1, 0), Position::new(1, 0))
        } else {
            let first = self.tokens[0];
            let last = self.tokens[self.tokens.len() - 1];
            (
                Span::new(first.range.start, last.range.end),
                first.start,
                last.end,
            )
        };
        let root = self
            .ast
            .push(NodeKind::Program, span, start, end, statements, None);
        self.ast.link_parents(root);
        Ok(self.ast)
    }

    // --- statements ---

    fn statement(&mut self) -> Result<NodeId, ParseError> {
        let token = self.expect_any("statement")?;
        match (token.kind, token.value.as_str()) {
            (TokenKind::Keyword, "var" | "let" | "const") => self.variable_declaration(),
            (TokenKind::Keyword, "function") => self.function_declaration(),
            (TokenKind::Keyword, "if") => self.if_statement(),
            (TokenKind::Keyword, "while") => self.while_statement(),
            (TokenKind::Keyword, "return") => self.return_statement(),
            (TokenKind::Punctuator, "{") => self.block(),
            _ => self.expression_statement(),
        }
    }

    fn variable_declaration(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.bump_expected();
        let (start_span, start_pos) = (keyword.range, keyword.start);
        let keyword_text = keyword.value.clone();

        let mut declarators = vec![self.declarator()?];
        while self.eat_punct(",") {
            declarators.push(self.declarator()?);
        }

        let (end_offset, end_pos) = self.optional_semicolon_end(declarators[declarators.len() - 1]);
        Ok(self.ast.push(
            NodeKind::VariableDeclaration,
            Span::new(start_span.start, end_offset),
            start_pos,
            end_pos,
            declarators,
            Some(keyword_text),
        ))
    }

    fn declarator(&mut self) -> Result<NodeId, ParseError> {
        let name = self.identifier()?;
        let mut children = vec![name];
        if self.eat_punct("=") {
            children.push(self.assignment_expression()?);
        }
        let last = children[children.len() - 1];
        Ok(self.wrap(NodeKind::VariableDeclarator, &children, name, last, None))
    }

    fn function_declaration(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.bump_expected();
        let (start_span, start_pos) = (keyword.range, keyword.start);

        let name = self.identifier()?;
        let mut children = vec![name];

        self.expect_punct("(")?;
        if !self.at_punct(")") {
            children.push(self.identifier()?);
            while self.eat_punct(",") {
                children.push(self.identifier()?);
            }
        }
        self.expect_punct(")")?;

        self.expect_any("function body")?;
        let body = self.block()?;
        children.push(body);

        let body_data = self.ast.node(body);
        let (end_offset, end_pos) = (body_data.span.end, body_data.end);
        Ok(self.ast.push(
            NodeKind::FunctionDeclaration,
            Span::new(start_span.start, end_offset),
            start_pos,
            end_pos,
            children,
            None,
        ))
    }

    fn block(&mut self) -> Result<NodeId, ParseError> {
        let open = self.expect_punct("{")?;
        let (start_span, start_pos) = (open.range, open.start);

        let mut statements = Vec::new();
        while !self.at_punct("}") {
            if self.peek().is_none() {
                return Err(self.eof_error("`}`"));
            }
            statements.push(self.statement()?);
        }
        let close = self.expect_punct("}")?;
        let (end_offset, end_pos) = (close.range.end, close.end);

        Ok(self.ast.push(
            NodeKind::BlockStatement,
            Span::new(start_span.start, end_offset),
            start_pos,
            end_pos,
            statements,
            None,
        ))
    }

    fn if_statement(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.bump_expected();
        let (start_span, start_pos) = (keyword.range, keyword.start);

        self.expect_punct("(")?;
        let condition = self.expression()?;
        self.expect_punct(")")?;

        self.expect_any("statement")?;
        let consequent = self.statement()?;
        let mut children = vec![condition, consequent];

        if self.at_keyword("else") {
            self.bump_expected();
            self.expect_any("statement")?;
            children.push(self.statement()?);
        }

        let last = self.ast.node(children[children.len() - 1]);
        let (end_offset, end_pos) = (last.span.end, last.end);
        Ok(self.ast.push(
            NodeKind::IfStatement,
            Span::new(start_span.start, end_offset),
            start_pos,
            end_pos,
            children,
            None,
        ))
    }

    fn while_statement(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.bump_expected();
        let (start_span, start_pos) = (keyword.range, keyword.start);

        self.expect_punct("(")?;
        let condition = self.expression()?;
        self.expect_punct(")")?;

        self.expect_any("statement")?;
        let body = self.statement()?;

        let last = self.ast.node(body);
        let (end_offset, end_pos) = (last.span.end, last.end);
        Ok(self.ast.push(
            NodeKind::WhileStatement,
            Span::new(start_span.start, end_offset),
            start_pos,
            end_pos,
            vec![condition, body],
            None,
        ))
    }

    fn return_statement(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.bump_expected();
        let (start_span, start_pos, mut end_offset, mut end_pos) =
            (keyword.range, keyword.start, keyword.range.end, keyword.end);

        let mut children = Vec::new();
        if !self.at_punct(";") && !self.at_punct("}") && self.peek().is_some() {
            let value = self.expression()?;
            children.push(value);
            let data = self.ast.node(value);
            end_offset = data.span.end;
            end_pos = data.end;
        }
        if self.at_punct(";") {
            let semi = self.bump_expected();
            end_offset = semi.range.end;
            end_pos = semi.end;
        }

        Ok(self.ast.push(
            NodeKind::ReturnStatement,
            Span::new(start_span.start, end_offset),
            start_pos,
            end_pos,
            children,
            None,
        ))
    }

    fn expression_statement(&mut self) -> Result<NodeId, ParseError> {
        let expression = self.expression()?;
        let (end_offset, end_pos) = self.optional_semicolon_end(expression);
        let data = self.ast.node(expression);
        let (start_offset, start_pos) = (data.span.start, data.start);
        Ok(self.ast.push(
            NodeKind::ExpressionStatement,
            Span::new(start_offset, end_offset),
            start_pos,
            end_pos,
            vec![expression],
            None,
        ))
    }

    // --- expressions ---

    fn expression(&mut self) -> Result<NodeId, ParseError> {
        self.assignment_expression()
    }

    fn assignment_expression(&mut self) -> Result<NodeId, ParseError> {
        let left = self.binary_expression(0)?;
        for op in ["=", "+=", "-=", "*=", "/="] {
            if self.at_punct(op) {
                let op_token = self.bump_expected();
                let op_text = op_token.value.clone();
                let right = self.assignment_expression()?;
                return Ok(self.wrap(
                    NodeKind::AssignmentExpression,
                    &[left, right],
                    left,
                    right,
                    Some(op_text),
                ));
            }
        }
        Ok(left)
    }

    fn binary_expression(&mut self, min_precedence: u8) -> Result<NodeId, ParseError> {
        let mut left = self.unary_expression()?;
        loop {
            let Some(op) = self.peek_binary_op() else {
                break;
            };
            let precedence = binary_precedence(&op);
            if precedence < min_precedence {
                break;
            }
            let op_token = self.bump_expected();
            let op_text = op_token.value.clone();
            let right = self.binary_expression(precedence + 1)?;
            left = self.wrap(
                NodeKind::BinaryExpression,
                &[left, right],
                left,
                right,
                Some(op_text),
            );
        }
        Ok(left)
    }

    fn peek_binary_op(&self) -> Option<String> {
        let token = self.peek()?;
        let is_op = match token.kind {
            TokenKind::Punctuator => matches!(
                token.value.as_str(),
                "||" | "&&" | "==" | "!=" | "===" | "!==" | "<" | ">" | "<=" | ">=" | "+" | "-"
                    | "*" | "/" | "%"
            ),
            TokenKind::Keyword => matches!(token.value.as_str(), "in" | "instanceof"),
            _ => false,
        };
        is_op.then(|| token.value.clone())
    }

    fn unary_expression(&mut self) -> Result<NodeId, ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.eof_error("expression"));
        };
        let is_unary = matches!(
            (token.kind, token.value.as_str()),
            (TokenKind::Punctuator, "!" | "-" | "+" | "~")
                | (TokenKind::Keyword, "typeof" | "delete" | "void" | "new")
        );
        if is_unary {
            let op_token = self.bump_expected();
            let (op_span, op_pos) = (op_token.range, op_token.start);
            let op_text = op_token.value.clone();
            let operand = self.unary_expression()?;
            let data = self.ast.node(operand);
            let (end_offset, end_pos) = (data.span.end, data.end);
            return Ok(self.ast.push(
                NodeKind::UnaryExpression,
                Span::new(op_span.start, end_offset),
                op_pos,
                end_pos,
                vec![operand],
                Some(op_text),
            ));
        }
        self.postfix_expression()
    }

    fn postfix_expression(&mut self) -> Result<NodeId, ParseError> {
        let mut node = self.primary_expression()?;
        loop {
            if self.at_punct(".") {
                self.bump_expected();
                let property = self.identifier()?;
                node = self.wrap(NodeKind::MemberExpression, &[node, property], node, property, None);
            } else if self.at_punct("[") {
                self.bump_expected();
                let property = self.expression()?;
                let close = self.expect_punct("]")?;
                let (close_end, close_pos) = (close.range.end, close.end);
                let start_data = self.ast.node(node);
                let (start_offset, start_pos) = (start_data.span.start, start_data.start);
                node = self.ast.push(
                    NodeKind::MemberExpression,
                    Span::new(start_offset, close_end),
                    start_pos,
                    close_pos,
                    vec![node, property],
                    None,
                );
            } else if self.at_punct("(") {
                self.bump_expected();
                let mut children = vec![node];
                if !self.at_punct(")") {
                    children.push(self.assignment_expression()?);
                    while self.eat_punct(",") {
                        children.push(self.assignment_expression()?);
                    }
                }
                let close = self.expect_punct(")")?;
                let (close_end, close_pos) = (close.range.end, close.end);
                let start_data = self.ast.node(node);
                let (start_offset, start_pos) = (start_data.span.start, start_data.start);
                node = self.ast.push(
                    NodeKind::CallExpression,
                    Span::new(start_offset, close_end),
                    start_pos,
                    close_pos,
                    children,
                    None,
                );
            } else {
                break;
            }
        }
        Ok(node)
    }

    fn primary_expression(&mut self) -> Result<NodeId, ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.eof_error("expression"));
        };
        match (token.kind, token.value.as_str()) {
            (TokenKind::Punctuator, "(") => {
                // Grouping parens: parse the inner expression, produce no
                // node. The inner node's range excludes the parens.
                self.bump_expected();
                let inner = self.expression()?;
                self.expect_punct(")")?;
                Ok(inner)
            }
            (TokenKind::Punctuator, "{") => self.object_expression(),
            (TokenKind::Punctuator, "[") => self.array_expression(),
            (TokenKind::Identifier, _) => self.identifier(),
            (TokenKind::Number, _) => Ok(self.leaf(NodeKind::NumberLiteral)),
            (TokenKind::String, _) => Ok(self.leaf(NodeKind::StringLiteral)),
            (TokenKind::Keyword, "true" | "false") => Ok(self.leaf(NodeKind::BooleanLiteral)),
            (TokenKind::Keyword, "null") => Ok(self.leaf(NodeKind::NullLiteral)),
            (TokenKind::Keyword, "this") => Ok(self.leaf(NodeKind::Identifier)),
            _ => Err(self.unexpected(token)),
        }
    }

    fn object_expression(&mut self) -> Result<NodeId, ParseError> {
        let open = self.expect_punct("{")?;
        let (start_span, start_pos) = (open.range, open.start);

        let mut properties = Vec::new();
        if !self.at_punct("}") {
            properties.push(self.property()?);
            while self.eat_punct(",") {
                if self.at_punct("}") {
                    break; // trailing comma
                }
                properties.push(self.property()?);
            }
        }
        let close = self.expect_punct("}")?;

        Ok(self.ast.push(
            NodeKind::ObjectExpression,
            Span::new(start_span.start, close.range.end),
            start_pos,
            close.end,
            properties,
            None,
        ))
    }

    fn property(&mut self) -> Result<NodeId, ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.eof_error("property key"));
        };
        let key = match token.kind {
            TokenKind::Identifier => self.identifier()?,
            // Keywords are legal as unquoted property keys.
            TokenKind::Keyword => self.leaf(NodeKind::Identifier),
            TokenKind::String => self.leaf(NodeKind::StringLiteral),
            TokenKind::Number => self.leaf(NodeKind::NumberLiteral),
            _ => return Err(self.unexpected(token)),
        };
        self.expect_punct(":")?;
        let value = self.assignment_expression()?;
        Ok(self.wrap(NodeKind::Property, &[key, value], key, value, None))
    }

    fn array_expression(&mut self) -> Result<NodeId, ParseError> {
        let open = self.expect_punct("[")?;
        let (start_span, start_pos) = (open.range, open.start);

        let mut elements = Vec::new();
        if !self.at_punct("]") {
            elements.push(self.assignment_expression()?);
            while self.eat_punct(",") {
                if self.at_punct("]") {
                    break;
                }
                elements.push(self.assignment_expression()?);
            }
        }
        let close = self.expect_punct("]")?;

        Ok(self.ast.push(
            NodeKind::ArrayExpression,
            Span::new(start_span.start, close.range.end),
            start_pos,
            close.end,
            elements,
            None,
        ))
    }

    fn identifier(&mut self) -> Result<NodeId, ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.eof_error("identifier"));
        };
        if token.kind != TokenKind::Identifier {
            return Err(self.unexpected(token));
        }
        Ok(self.leaf(NodeKind::Identifier))
    }

    // --- helpers ---

    /// Consumes the current token into a leaf node carrying its raw text.
    fn leaf(&mut self, kind: NodeKind) -> NodeId {
        let token = self.bump_expected();
        let (span, start, end) = (token.range, token.start, token.end);
        let text = token.value.clone();
        self.ast
            .push(kind, span, start, end, Vec::new(), Some(text))
    }

    /// Creates a node spanning from `first` to `last` with the given
    /// children.
    fn wrap(
        &mut self,
        kind: NodeKind,
        children: &[NodeId],
        first: NodeId,
        last: NodeId,
        text: Option<String>,
    ) -> NodeId {
        let start_data = self.ast.node(first);
        let (start_offset, start_pos) = (start_data.span.start, start_data.start);
        let end_data = self.ast.node(last);
        let (end_offset, end_pos) = (end_data.span.end, end_data.end);
        self.ast.push(
            kind,
            Span::new(start_offset, end_offset),
            start_pos,
            end_pos,
            children.to_vec(),
            text,
        )
    }

    fn optional_semicolon_end(&mut self, fallback: NodeId) -> (usize, Position) {
        if self.at_punct(";") {
            let semi = self.bump_expected();
            (semi.range.end, semi.end)
        } else {
            let data = self.ast.node(fallback);
            (data.span.end, data.end)
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos).copied()
    }

    /// Consumes the current token. Only called after `peek` confirmed one
    /// exists.
    fn bump_expected(&mut self) -> &'t Token {
        let token = self.tokens[self.pos];
        self.pos += 1;
        token
    }

    fn at_punct(&self, value: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Punctuator && t.value == value)
    }

    fn at_keyword(&self, value: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Keyword && t.value == value)
    }

    fn eat_punct(&mut self, value: &str) -> bool {
        if self.at_punct(value) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, value: &str) -> Result<&'t Token, ParseError> {
        if self.at_punct(value) {
            Ok(self.bump_expected())
        } else {
            match self.peek() {
                Some(token) => Err(ParseError::new(
                    format!("expected `{value}`, found `{}`", token.value),
                    token.start.line,
                    token.start.column,
                )),
                None => Err(self.eof_error(&format!("`{value}`"))),
            }
        }
    }

    /// Fails unless another token exists; used to make "statement expected
    /// here" errors point at the end of input.
    fn expect_any(&self, what: &str) -> Result<&'t Token, ParseError> {
        self.peek().ok_or_else(|| self.eof_error(what))
    }

    fn unexpected(&self, token: &Token) -> ParseError {
        ParseError::new(
            format!("unexpected token `{}`", token.value),
            token.start.line,
            token.start.column,
        )
    }

    fn eof_error(&self, expected: &str) -> ParseError {
        let (line, column) = self
            .tokens
            .last()
            .map_or((1, 0), |t| (t.end.line, t.end.column));
        ParseError::new(format!("unexpected end of input, expected {expected}"), line, column)
    }
}

fn binary_precedence(op: &str) -> u8 {
    match op {
        "||" => 1,
        "&&" => 2,
        "==" | "!=" | "===" | "!==" => 3,
        "<" | ">" | "<=" | ">=" | "in" | "instanceof" => 4,
        "+" | "-" => 5,
        _ => 6,
    }
}
