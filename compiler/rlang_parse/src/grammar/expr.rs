//! The precedence-climbing expression engine.
//!
//! One recursive entry point, `parse_expression(gate)`, resolves the whole
//! 30-tier operator table: an atom phase (committed choice on lookahead)
//! followed by an iterative extension loop that wraps the built expression
//! as the left child of each infix/postfix operator whose tier is strictly
//! greater than the gate. Left-associative tiers recurse at their own tier,
//! right-associative ones a tier lower.

use crate::{Parser, MAX_EXPR_DEPTH};
use rlang_diagnostic::ErrorCode;
use rlang_ir::{Element, NodeId, NodeKind, TokenKind};
use rlang_stack::ensure_sufficient_stack;
use tracing::trace;

use super::ANY_TIER;
use crate::ParseError;

impl<'a> Parser<'a> {
    /// Parse one expression. Extension operators are absorbed only while
    /// their tier is strictly greater than `gate`.
    ///
    /// Returns `None` when no atom matches at the current position without
    /// consuming anything; the caller decides whether that is an error.
    pub(crate) fn parse_expression(&mut self, gate: i8) -> Option<NodeId> {
        if self.check_cancelled() {
            return None;
        }
        if self.depth >= MAX_EXPR_DEPTH {
            self.report_depth_limit();
            return None;
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.parse_expression_inner(gate));
        self.depth -= 1;
        result
    }

    fn parse_expression_inner(&mut self, gate: i8) -> Option<NodeId> {
        let mut left = self.parse_atom()?;
        loop {
            let before = self.cursor.position();
            let Some(extended) = self.parse_extension(left, gate) else {
                break;
            };
            // Every extension consumes at least its operator token; a stuck
            // iteration is a grammar bug, so fail fast instead of spinning.
            debug_assert!(self.cursor.position() > before, "extension made no progress");
            if self.cursor.position() == before {
                break;
            }
            left = extended;
        }
        Some(left)
    }

    /// Atom phase: committed choice keyed on the current token (lookahead-2
    /// only for namespace access). Compound statements come first, then
    /// prefix-operator forms, then terminal literals.
    fn parse_atom(&mut self) -> Option<NodeId> {
        trace!(kind = ?self.cursor.current_kind(), "atom dispatch");
        let node = match self.cursor.current_kind() {
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Repeat => self.parse_repeat(),
            TokenKind::Break => self.parse_single_token_statement(NodeKind::BreakStatement),
            TokenKind::Next => self.parse_single_token_statement(NodeKind::NextStatement),
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Help => self.parse_help(),
            TokenKind::LPar => self.parse_parenthesized(),
            TokenKind::Function => self.parse_function(),
            TokenKind::Tilde => {
                self.parse_unary(NodeKind::UnaryTildeExpression, NodeKind::TildeOperator, 13)
            }
            TokenKind::Not => {
                self.parse_unary(NodeKind::UnaryNotExpression, NodeKind::NotOperator, 17)
            }
            TokenKind::Plus | TokenKind::Minus => self.parse_unary(
                NodeKind::UnaryPlusminusExpression,
                NodeKind::PlusminusOperator,
                23,
            ),
            TokenKind::Identifier if self.cursor.is_namespace_access_start() => {
                self.parse_namespace_access()
            }
            TokenKind::Identifier => self.wrap_current_token(NodeKind::IdentifierExpression),
            TokenKind::String => self.wrap_current_token(NodeKind::StringLiteral),
            TokenKind::Integer | TokenKind::Numeric | TokenKind::Complex => {
                self.wrap_current_token(NodeKind::NumericLiteral)
            }
            TokenKind::True | TokenKind::False => {
                self.wrap_current_token(NodeKind::BooleanLiteral)
            }
            TokenKind::Na
            | TokenKind::NaInteger
            | TokenKind::NaReal
            | TokenKind::NaComplex
            | TokenKind::NaCharacter => self.wrap_current_token(NodeKind::NaLiteral),
            TokenKind::Null => self.wrap_current_token(NodeKind::NullLiteral),
            TokenKind::Inf | TokenKind::NaN => {
                self.wrap_current_token(NodeKind::BoundaryLiteral)
            }
            TokenKind::Error => self.parse_lexer_error(),
            _ => return None,
        };
        Some(node)
    }

    /// One step of the extension loop: if the current token (or, for `|`/`&`
    /// tiers, the first token past a newline run) is an operator whose tier
    /// beats `gate`, build the wrapping node and return it.
    fn parse_extension(&mut self, left: NodeId, gate: i8) -> Option<NodeId> {
        use NodeKind as N;
        use TokenKind as T;

        let node = match self.cursor.current_kind() {
            // Assignments are right-associative: the right side is gated one
            // below the operator's own tier so a same-tier operator nests.
            T::LeftAssign | T::LeftComplexAssign | T::LeftAssignOld if gate < 10 => {
                self.parse_binary(left, N::AssignOperator, N::AssignmentStatement, 9)
            }
            T::Eq if gate < 11 => self.parse_eq_assignment(left),
            T::RightAssign | T::RightComplexAssign if gate < 12 => {
                self.parse_binary(left, N::AssignOperator, N::AssignmentStatement, 11)
            }
            T::Tilde if gate < 14 => self.parse_binary(left, N::TildeOperator, N::TildeExpression, 14),
            T::Or | T::OrOr if gate < 15 => {
                self.parse_binary(left, N::OrOperator, N::OperatorExpression, 15)
            }
            T::And | T::AndAnd if gate < 16 => {
                self.parse_binary(left, N::AndOperator, N::OperatorExpression, 16)
            }
            T::Gt | T::Ge | T::Lt | T::Le | T::EqEq | T::NotEq if gate < 18 => {
                self.parse_binary(left, N::CompareOperator, N::OperatorExpression, 18)
            }
            T::Plus | T::Minus if gate < 19 => {
                self.parse_binary(left, N::PlusminusOperator, N::OperatorExpression, 19)
            }
            T::Mult | T::Div if gate < 20 => {
                self.parse_binary(left, N::MuldivOperator, N::OperatorExpression, 20)
            }
            T::InfixOp if gate < 21 => {
                self.parse_binary(left, N::InfixOperator, N::OperatorExpression, 21)
            }
            T::Colon if gate < 22 => {
                self.parse_binary(left, N::ColonOperator, N::OperatorExpression, 22)
            }
            T::Exp if gate < 24 => {
                self.parse_binary(left, N::ExpOperator, N::OperatorExpression, 24)
            }
            T::LBracket | T::LDbracket if gate < 25 => self.parse_subscription(left),
            T::LPar if gate < 26 => self.parse_call(left),
            T::ListSubset if gate < 27 => self.parse_member(left),
            T::At if gate < 28 => self.parse_binary(left, N::AtOperator, N::OperatorExpression, 28),
            // A newline normally ends the statement, but `|`/`&` tiers allow
            // the operator to open a continuation line.
            T::Newline => match self.cursor.peek_past_newlines() {
                T::Or | T::OrOr if gate < 15 => {
                    self.parse_binary(left, N::OrOperator, N::OperatorExpression, 15)
                }
                T::And | T::AndAnd if gate < 16 => {
                    self.parse_binary(left, N::AndOperator, N::OperatorExpression, 16)
                }
                _ => return None,
            },
            _ => return None,
        };
        Some(node)
    }

    /// Binary infix form: `left op nl* right`.
    ///
    /// Newlines before the operator have already been approved by the
    /// caller (only the `|`/`&` tiers get here through a newline run).
    fn parse_binary(
        &mut self,
        left: NodeId,
        op_kind: NodeKind,
        node_kind: NodeKind,
        right_gate: i8,
    ) -> NodeId {
        let mut children = vec![Element::Node(left)];
        self.eat_newlines(&mut children);
        trace!(op = ?self.cursor.current_kind(), ?node_kind, "extend");
        let op = self.wrap_current_token(op_kind);
        children.push(Element::Node(op));
        self.eat_newlines(&mut children);
        self.required_expression(right_gate, &mut children);
        self.finish(node_kind, children)
    }

    /// `=` assignment (tier 11). Unlike the other assignment operators the
    /// right side may be explicitly empty (`x =` before a statement
    /// boundary), mirroring empty list slots.
    ///
    /// `=` as a named-argument binder never reaches this: list interiors
    /// recognize `name =` by lookahead before invoking the engine.
    fn parse_eq_assignment(&mut self, left: NodeId) -> NodeId {
        let mut children = vec![Element::Node(left)];
        let op = self.wrap_current_token(NodeKind::AssignOperator);
        children.push(Element::Node(op));
        self.eat_newlines(&mut children);
        match self.parse_expression(ANY_TIER) {
            Some(rhs) => children.push(Element::Node(rhs)),
            None => {
                let empty = self.empty_expression();
                children.push(Element::Node(empty));
            }
        }
        self.finish(NodeKind::AssignmentStatement, children)
    }

    /// Prefix operator atom: `op nl* operand`.
    fn parse_unary(&mut self, node_kind: NodeKind, op_kind: NodeKind, operand_gate: i8) -> NodeId {
        let mut children = Vec::new();
        let op = self.wrap_current_token(op_kind);
        children.push(Element::Node(op));
        self.eat_newlines(&mut children);
        self.required_expression(operand_gate, &mut children);
        self.finish(node_kind, children)
    }

    /// `pkg::name` / `pkg:::name` (tier 29). Binds tighter than every
    /// operator, so `pkg::f()` is `(pkg::f)()`.
    fn parse_namespace_access(&mut self) -> NodeId {
        let mut children = Vec::new();
        let name = self.wrap_current_token(NodeKind::IdentifierExpression);
        children.push(Element::Node(name));
        self.bump(&mut children); // :: or :::
        self.required_expression(29, &mut children);
        self.finish(NodeKind::NamespaceAccessExpression, children)
    }

    /// `$` member access (tier 27). The tag is an atom-level expression
    /// (identifier, string, parenthesized form, or namespace access).
    fn parse_member(&mut self, left: NodeId) -> NodeId {
        let mut children = vec![Element::Node(left)];
        let op = self.wrap_current_token(NodeKind::ListSubsetOperator);
        children.push(Element::Node(op));
        self.eat_newlines(&mut children);
        self.required_expression(29, &mut children);
        self.finish(NodeKind::MemberExpression, children)
    }

    /// A lexer error token in expression position: wrap it so parsing
    /// continues past it.
    fn parse_lexer_error(&mut self) -> NodeId {
        let span = self.cursor.current_span();
        self.report(ParseError::new(
            ErrorCode::E1006,
            "invalid token in expression",
            span,
        ));
        self.wrap_current_token(NodeKind::Error)
    }

    /// Report the depth limit once per parse; deeper positions simply fail
    /// to produce an expression and recovery takes over.
    fn report_depth_limit(&mut self) {
        if self.depth_limit_reported {
            return;
        }
        self.depth_limit_reported = true;
        self.report(ParseError::new(
            ErrorCode::E9001,
            format!("expression nesting exceeds the limit of {MAX_EXPR_DEPTH}"),
            self.cursor.current_span(),
        ));
    }
}
