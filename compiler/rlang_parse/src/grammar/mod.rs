//! Grammar rules.
//!
//! Split by family: the precedence-climbing expression engine (`expr`),
//! compound statements (`stmt`), and the bracketed list forms (`lists`).
//! Expressions and statements are mutually recursive: `if`, `while`, blocks
//! and friends are valid expression atoms in R, so the statement parsers sit
//! beside the expression engine as sibling functions on the same `Parser`.
//!
//! All rules follow the same discipline: check the leading token before
//! consuming (committed choice on lookahead), pin once the leading token is
//! consumed, and record missing pieces as in-place errors rather than
//! unwinding.

mod expr;
mod lists;
mod stmt;

use crate::recovery::{synchronize, TokenSet};
use crate::{ParseError, Parser};
use rlang_diagnostic::ErrorCode;
use rlang_ir::{Element, NodeId, NodeKind, Span, TokenKind};
use tracing::debug;

/// Precedence gate that admits every operator tier.
pub(crate) const ANY_TIER: i8 = -1;

/// Tree-building and error-recording helpers shared by all grammar rules.
impl<'a> Parser<'a> {
    /// Consume the current token as a leaf of the node under construction.
    pub(crate) fn bump(&mut self, children: &mut Vec<Element>) {
        debug_assert!(!self.cursor.is_at_end(), "bump at end of input");
        children.push(Element::Token(self.cursor.current_id()));
        self.cursor.advance();
    }

    /// Consume the current token wrapped in a single-token node of `kind`.
    ///
    /// Used for operator wrappers and for literal/identifier leaves.
    pub(crate) fn wrap_current_token(&mut self, kind: NodeKind) -> NodeId {
        let span = self.cursor.current_span();
        let mut children = Vec::with_capacity(1);
        self.bump(&mut children);
        self.tree.alloc(kind, span, children)
    }

    /// Skip optional newlines, keeping them as leaves of the current node.
    ///
    /// This is the single shared primitive for every position where the
    /// grammar treats newlines as transparent (after an open delimiter,
    /// after an operator, before `else` once an `else` is known to follow).
    pub(crate) fn eat_newlines(&mut self, children: &mut Vec<Element>) {
        while self.cursor.check(TokenKind::Newline) {
            self.bump(children);
        }
    }

    /// Consume the expected token, or record an in-place error and continue.
    ///
    /// This is the pinned-construct discipline: the construct is already
    /// committed, so a missing piece never unwinds it.
    pub(crate) fn expect_in(&mut self, kind: TokenKind, children: &mut Vec<Element>) -> bool {
        if self.cursor.check(kind) {
            self.bump(children);
            true
        } else {
            let error = self.cursor.make_expect_error(kind);
            self.report(error);
            false
        }
    }

    /// Parse a required expression into `children`; a missing expression
    /// becomes an in-place error node.
    pub(crate) fn required_expression(&mut self, gate: i8, children: &mut Vec<Element>) {
        match self.parse_expression(gate) {
            Some(expr) => children.push(Element::Node(expr)),
            None => {
                let missing = self.missing_expression();
                children.push(Element::Node(missing));
            }
        }
    }

    /// Record an error node for a position where an expression was required
    /// but none could be parsed.
    pub(crate) fn missing_expression(&mut self) -> NodeId {
        let span = Span::point(self.cursor.current_span().start);
        self.report(ParseError::new(
            ErrorCode::E1002,
            format!(
                "expected expression, found {}",
                self.cursor.current_kind().display_name()
            ),
            span,
        ));
        self.tree.alloc(NodeKind::Error, span, Vec::new())
    }

    /// Allocate an explicit empty-slot node at the current position.
    ///
    /// Empty slots (`x[, 1]`, `f(,)`, `x =`) are real nodes, never absence,
    /// so positional slot counts survive for downstream consumers.
    pub(crate) fn empty_expression(&mut self) -> NodeId {
        let span = Span::point(self.cursor.current_span().start);
        self.tree.alloc(NodeKind::EmptyExpression, span, Vec::new())
    }

    /// Skip forward to a recovery token, wrapping everything skipped in an
    /// error node so the tree still covers the input.
    pub(crate) fn sweep_error(&mut self, recovery: TokenSet) -> NodeId {
        let skipped = synchronize(&mut self.cursor, recovery);
        debug!(?skipped, "recovery: skipped to synchronizing token");
        self.error_node_for(skipped)
    }

    /// Wrap a range of already-skipped tokens in an error node.
    pub(crate) fn error_node_for(&mut self, range: std::ops::Range<u32>) -> NodeId {
        if range.is_empty() {
            let span = Span::point(self.cursor.current_span().start);
            return self.tree.alloc(NodeKind::Error, span, Vec::new());
        }
        let children: Vec<Element> = range.clone().map(Element::Token).collect();
        let span = self
            .token_span(range.start)
            .merge(self.token_span(range.end - 1));
        self.tree.alloc(NodeKind::Error, span, children)
    }

    /// Finish a node: compute its span from its children and allocate it.
    pub(crate) fn finish(&mut self, kind: NodeKind, children: Vec<Element>) -> NodeId {
        let span = self.span_of(&children);
        self.tree.alloc(kind, span, children)
    }

    fn span_of(&self, children: &[Element]) -> Span {
        let mut iter = children.iter().map(|el| match el {
            Element::Token(t) => self.token_span(*t),
            Element::Node(n) => self.tree.span(*n),
        });
        let Some(first) = iter.next() else {
            return Span::point(self.cursor.current_span().start);
        };
        iter.fold(first, Span::merge)
    }

    fn token_span(&self, id: u32) -> Span {
        self.tokens[id as usize].span
    }
}
