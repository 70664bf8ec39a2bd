//! Arena-backed syntax tree.
//!
//! Nodes live in a flat arena and reference each other by `NodeId` index.
//! A node owns an ordered list of child elements, each either a token index
//! or another node. Every token the parser consumes lands in exactly one
//! node's child list, in source order, which makes the tree lossless: the
//! source can be reconstructed from the leaves.

use super::{NodeKind, Span, TokenId, TokenList};
use std::fmt::Write as _;

/// Index of a node in a [`SyntaxTree`] arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A child of a syntax node: a leaf token or a nested node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Element {
    Token(TokenId),
    Node(NodeId),
}

/// A syntax node: kind, covered span, ordered children.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    children: Vec<Element>,
}

impl Node {
    #[inline]
    pub fn children(&self) -> &[Element] {
        &self.children
    }
}

/// Flat arena of syntax nodes with a designated root.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        SyntaxTree {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Allocate a node and return its id.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` nodes.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "node count cannot exceed u32::MAX for any input the span type admits"
    )]
    pub fn alloc(&mut self, kind: NodeKind, span: Span, children: Vec<Element>) -> NodeId {
        debug_assert!(
            children_valid(&self.nodes, &children),
            "child node allocated after its parent for {kind:?}"
        );
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            span,
            children,
        });
        id
    }

    /// Mark the root node. Called once, after the whole input is parsed.
    pub fn set_root(&mut self, id: NodeId) {
        debug_assert!(id.index() < self.nodes.len());
        self.root = Some(id);
    }

    /// The root node id.
    ///
    /// # Panics
    /// Panics if no root was set; a completed parse always sets one.
    pub fn root(&self) -> NodeId {
        match self.root {
            Some(id) => id,
            None => panic!("syntax tree has no root"),
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child nodes of `id`, skipping leaf tokens.
    pub fn child_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children().iter().filter_map(|el| match el {
            Element::Node(n) => Some(*n),
            Element::Token(_) => None,
        })
    }

    /// First child node of `id` with the given kind.
    pub fn find_child(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.child_nodes(id).find(|&n| self.kind(n) == kind)
    }

    /// Child node of `id` at position `n` (counting nodes only).
    pub fn nth_child_node(&self, id: NodeId, n: usize) -> Option<NodeId> {
        self.child_nodes(id).nth(n)
    }

    /// All leaf tokens under `id`, in source order.
    ///
    /// Iterative preorder walk; the tree can be as deep as the input is
    /// nested, so no recursion here.
    pub fn leaf_tokens(&self, id: NodeId) -> Vec<TokenId> {
        let mut out = Vec::new();
        let mut stack = vec![Element::Node(id)];
        while let Some(el) = stack.pop() {
            match el {
                Element::Token(t) => out.push(t),
                Element::Node(n) => {
                    for child in self.node(n).children().iter().rev() {
                        stack.push(*child);
                    }
                }
            }
        }
        out
    }

    /// Reconstruct the source text covered by the tree.
    ///
    /// Walks the leaves in order and emits, for each token, the source from
    /// the end of the previous token through the end of this one, then the
    /// trailing remainder. When every source token appears exactly once and
    /// in order, the result equals the original source.
    pub fn reconstruct_source(&self, tokens: &TokenList) -> String {
        let source = tokens.source();
        let mut out = String::with_capacity(source.len());
        let mut prev_end = 0usize;
        for id in self.leaf_tokens(self.root()) {
            let span = tokens[id as usize].span;
            out.push_str(&source[prev_end..span.end as usize]);
            prev_end = span.end as usize;
        }
        out.push_str(&source[prev_end..]);
        out
    }

    /// Indented kind/span listing, for test failure output.
    pub fn debug_dump(&self, tokens: &TokenList) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, self.root(), tokens, 0);
        out
    }

    fn dump_into(&self, out: &mut String, id: NodeId, tokens: &TokenList, depth: usize) {
        let node = self.node(id);
        let _ = writeln!(
            out,
            "{:indent$}{:?} @ {}",
            "",
            node.kind,
            node.span,
            indent = depth * 2
        );
        for el in node.children() {
            match el {
                Element::Token(t) => {
                    let token = &tokens[*t as usize];
                    let _ = writeln!(
                        out,
                        "{:indent$}{:?} {:?}",
                        "",
                        token.kind,
                        tokens.text(*t),
                        indent = (depth + 1) * 2
                    );
                }
                Element::Node(n) => self.dump_into(out, *n, tokens, depth + 1),
            }
        }
    }
}

/// Debug check: child nodes must already exist in the arena (nodes are
/// built bottom-up, so a child's id is always lower than its parent's).
fn children_valid(nodes: &[Node], children: &[Element]) -> bool {
    children.iter().all(|el| match el {
        Element::Node(n) => n.index() < nodes.len(),
        Element::Token(_) => true,
    })
}
