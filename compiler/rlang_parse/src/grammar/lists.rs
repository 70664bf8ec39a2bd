//! Bracketed list forms: call argument lists, subscription slot lists, and
//! function parameter lists.
//!
//! Inside a list interior newlines are always transparent, `=` after an
//! identifier or string binds a named slot instead of parsing as assignment,
//! and a slot left blank becomes an explicit empty-slot node so positional
//! indices survive.

use crate::recovery::{TokenSet, LIST_RECOVERY};
use crate::Parser;
use rlang_diagnostic::ErrorCode;
use rlang_ir::{Element, NodeId, NodeKind, TokenKind};

use super::ANY_TIER;
use crate::ParseError;

impl<'a> Parser<'a> {
    /// `callee ( args )` (tier 26).
    pub(crate) fn parse_call(&mut self, left: NodeId) -> NodeId {
        let mut children = vec![Element::Node(left)];
        let args = self.parse_argument_list();
        children.push(Element::Node(args));
        self.finish(NodeKind::CallExpression, children)
    }

    /// `( slot, slot, ... )`. `f()` has zero slots; `f(,)` has two empty
    /// ones.
    fn parse_argument_list(&mut self) -> NodeId {
        let mut children = Vec::new();
        self.bump(&mut children); // (
        self.parse_slot_list(&mut children, TokenKind::RPar, "call opened here");
        self.finish(NodeKind::ArgumentList, children)
    }

    /// `x[i, j]` / `x[[i]]` (tier 25). Slot handling is identical to call
    /// arguments; only the delimiters differ, and `[[` requires the matching
    /// `]]` closer.
    pub(crate) fn parse_subscription(&mut self, left: NodeId) -> NodeId {
        let close = if self.cursor.check(TokenKind::LDbracket) {
            TokenKind::RDbracket
        } else {
            TokenKind::RBracket
        };
        let mut children = vec![Element::Node(left)];
        self.bump(&mut children); // [ or [[
        self.parse_slot_list(&mut children, close, "subscript opened here");
        self.finish(NodeKind::SubscriptionExpression, children)
    }

    /// Shared interior of argument and subscription lists, from just after
    /// the opener through the closer.
    fn parse_slot_list(&mut self, children: &mut Vec<Element>, close: TokenKind, opened: &str) {
        let open_span = self.cursor.previous_span();
        let recovery = LIST_RECOVERY.with(close);
        self.eat_newlines(children);
        if self.cursor.check(close) {
            self.bump(children);
            return;
        }
        loop {
            let before = self.cursor.position();
            let slot = self.parse_slot();
            children.push(Element::Node(slot));
            self.eat_newlines(children);
            if self.cursor.check(TokenKind::Comma) {
                self.bump(children);
                self.eat_newlines(children);
                continue;
            }
            if self.cursor.check(close) {
                self.bump(children);
                return;
            }
            if self.cursor.is_at_end() || self.cancelled {
                let error = ParseError::new(
                    ErrorCode::E1003,
                    format!("unclosed '{}'", opener_text(close)),
                    self.cursor.current_span(),
                )
                .with_context(format!("{opened}: {open_span}"));
                self.report(error);
                return;
            }
            let error = ParseError::new(
                ErrorCode::E1001,
                format!(
                    "expected ',' or '{}', found {}",
                    close.display_name(),
                    self.cursor.current_kind().display_name()
                ),
                self.cursor.current_span(),
            );
            self.report(error);
            let swept = self.sweep_error(recovery);
            children.push(Element::Node(swept));
            if self.cursor.position() == before {
                // Recovery landed on a token this list cannot consume
                // (for example '}' ending an enclosing block).
                return;
            }
        }
    }

    /// One list slot: a named binding, an expression, or an explicit empty
    /// slot when neither is present.
    fn parse_slot(&mut self) -> NodeId {
        if self.cursor.is_named_argument_start() {
            return self.parse_named_argument();
        }
        match self.parse_expression(ANY_TIER) {
            Some(expr) => expr,
            None => self.empty_expression(),
        }
    }

    /// `name = value` or `"name" = value`; the value may itself be empty
    /// (`f(x =, 1)`).
    fn parse_named_argument(&mut self) -> NodeId {
        let mut children = Vec::new();
        let name_kind = if self.cursor.check(TokenKind::String) {
            NodeKind::StringLiteral
        } else {
            NodeKind::IdentifierExpression
        };
        let name = self.wrap_current_token(name_kind);
        children.push(Element::Node(name));
        let op = self.wrap_current_token(NodeKind::AssignOperator);
        children.push(Element::Node(op));
        self.eat_newlines(&mut children);
        match self.parse_expression(ANY_TIER) {
            Some(value) => children.push(Element::Node(value)),
            None => {
                let empty = self.empty_expression();
                children.push(Element::Node(empty));
            }
        }
        self.finish(NodeKind::NamedArgument, children)
    }

    /// `( name, name = default, ... )` after the `function` keyword.
    ///
    /// Unlike argument lists, parameters must be identifiers and blanks are
    /// not permitted.
    pub(crate) fn parse_parameter_list(&mut self) -> NodeId {
        const PARAM_RECOVERY: TokenSet = LIST_RECOVERY.with(TokenKind::RPar);

        let mut children = Vec::new();
        let open_span = self.cursor.current_span();
        self.bump(&mut children); // (
        self.eat_newlines(&mut children);
        if self.cursor.check(TokenKind::RPar) {
            self.bump(&mut children);
            return self.finish(NodeKind::ParameterList, children);
        }
        loop {
            let before = self.cursor.position();
            if self.cursor.check(TokenKind::Identifier) {
                let param = self.parse_parameter();
                children.push(Element::Node(param));
            } else {
                let error = ParseError::new(
                    ErrorCode::E1004,
                    format!(
                        "expected parameter name, found {}",
                        self.cursor.current_kind().display_name()
                    ),
                    self.cursor.current_span(),
                );
                self.report(error);
                let swept = self.sweep_error(PARAM_RECOVERY);
                children.push(Element::Node(swept));
            }
            self.eat_newlines(&mut children);
            if self.cursor.check(TokenKind::Comma) {
                self.bump(&mut children);
                self.eat_newlines(&mut children);
                continue;
            }
            if self.cursor.check(TokenKind::RPar) {
                self.bump(&mut children);
                break;
            }
            if self.cursor.is_at_end() || self.cancelled || self.cursor.position() == before {
                let error = ParseError::new(
                    ErrorCode::E1003,
                    "unclosed '('",
                    self.cursor.current_span(),
                )
                .with_context(format!("parameter list opened here: {open_span}"));
                self.report(error);
                break;
            }
        }
        self.finish(NodeKind::ParameterList, children)
    }

    /// `name` or `name = default`.
    fn parse_parameter(&mut self) -> NodeId {
        let mut children = Vec::new();
        self.bump(&mut children); // identifier
        if self.cursor.check(TokenKind::Eq) {
            self.bump(&mut children);
            self.eat_newlines(&mut children);
            self.required_expression(ANY_TIER, &mut children);
        }
        self.finish(NodeKind::Parameter, children)
    }
}

fn opener_text(close: TokenKind) -> &'static str {
    match close {
        TokenKind::RDbracket => "[[",
        TokenKind::RBracket => "[",
        _ => "(",
    }
}
