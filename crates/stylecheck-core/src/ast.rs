//! Arena-backed abstract syntax tree.
//!
//! Nodes live in a flat arena and reference each other through [`NodeId`]
//! indices, so parent back-references are plain non-owning ids instead of
//! reference cycles. Parents are linked in a single pass after the tree is
//! built and never reassigned.

use crate::token::{Position, Span};

/// Index of a node in the AST arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a node id from a raw arena index.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Returns the raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Syntactic kind of an AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root of a file.
    Program,
    /// `var` / `let` / `const` statement.
    VariableDeclaration,
    /// Single `name = init` declarator.
    VariableDeclarator,
    /// `function name(...) { ... }`.
    FunctionDeclaration,
    /// Statement block `{ ... }`.
    BlockStatement,
    /// Expression used as a statement.
    ExpressionStatement,
    /// `if (...) ... else ...`.
    IfStatement,
    /// `while (...) ...`.
    WhileStatement,
    /// `return ...;`.
    ReturnStatement,
    /// Identifier reference.
    Identifier,
    /// String literal.
    StringLiteral,
    /// Numeric literal.
    NumberLiteral,
    /// `true` / `false`.
    BooleanLiteral,
    /// `null`.
    NullLiteral,
    /// Object literal `{ key: value, ... }`.
    ObjectExpression,
    /// Single `key: value` entry of an object literal.
    Property,
    /// Array literal `[ ... ]`.
    ArrayExpression,
    /// Function or method call.
    CallExpression,
    /// `a.b` or `a[b]`.
    MemberExpression,
    /// Binary operation.
    BinaryExpression,
    /// Assignment.
    AssignmentExpression,
    /// Prefix unary operation.
    UnaryExpression,
}

/// Data of one AST node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Node kind.
    pub kind: NodeKind,
    /// Byte range covered by the node. Contained in the parent's range;
    /// sibling ranges never overlap.
    pub span: Span,
    /// Start position.
    pub start: Position,
    /// End position.
    pub end: Position,
    /// Parent node, `None` for the root. Set once by [`Ast::link_parents`].
    pub parent: Option<NodeId>,
    /// Children in source order.
    pub children: Vec<NodeId>,
    /// Raw text for leaves that carry one (identifier names, literal text,
    /// operators); `None` for structural nodes.
    pub text: Option<String>,
}

/// Arena holding the nodes of one parsed file.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<NodeData>,
    root: Option<NodeId>,
}

impl Ast {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its id. Children must already exist.
    pub fn push(
        &mut self,
        kind: NodeKind,
        span: Span,
        start: Position,
        end: Position,
        children: Vec<NodeId>,
        text: Option<String>,
    ) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            span,
            start,
            end,
            parent: None,
            children,
            text,
        });
        id
    }

    /// Marks `root` as the tree root and links every node's parent pointer
    /// in one traversal. Called exactly once, immediately after parsing.
    pub fn link_parents(&mut self, root: NodeId) {
        self.root = Some(root);
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let children = self.nodes[id.index()].children.clone();
            for child in children {
                self.nodes[child.index()].parent = Some(id);
                stack.push(child);
            }
        }
    }

    /// Returns the root node id.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the data of a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this arena.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    /// Returns the kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    /// Returns the children of a node in source order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Returns the parent of a node, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all node ids in arena order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(ast: &mut Ast, kind: NodeKind, start: usize, end: usize) -> NodeId {
        ast.push(
            kind,
            Span::new(start, end),
            Position::new(1, start),
            Position::new(1, end),
            Vec::new(),
            None,
        )
    }

    #[test]
    fn link_parents_sets_back_references_once() {
        let mut ast = Ast::new();
        let a = leaf(&mut ast, NodeKind::Identifier, 0, 1);
        let b = leaf(&mut ast, NodeKind::NumberLiteral, 4, 5);
        let stmt = ast.push(
            NodeKind::ExpressionStatement,
            Span::new(0, 5),
            Position::new(1, 0),
            Position::new(1, 5),
            vec![a, b],
            None,
        );
        let root = ast.push(
            NodeKind::Program,
            Span::new(0, 5),
            Position::new(1, 0),
            Position::new(1, 5),
            vec![stmt],
            None,
        );
        ast.link_parents(root);

        assert_eq!(ast.parent(root), None);
        assert_eq!(ast.parent(stmt), Some(root));
        assert_eq!(ast.parent(a), Some(stmt));
        assert_eq!(ast.parent(b), Some(stmt));
        assert_eq!(ast.root(), Some(root));
    }

    #[test]
    fn children_preserve_source_order() {
        let mut ast = Ast::new();
        let a = leaf(&mut ast, NodeKind::Identifier, 0, 1);
        let b = leaf(&mut ast, NodeKind::Identifier, 2, 3);
        let root = ast.push(
            NodeKind::Program,
            Span::new(0, 3),
            Position::new(1, 0),
            Position::new(1, 3),
            vec![a, b],
            None,
        );
        ast.link_parents(root);
        assert_eq!(ast.children(root), &[a, b]);
    }
}
