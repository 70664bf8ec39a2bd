//! Compound statement forms.
//!
//! Each form follows the same shape: consume the keyword (which pins the
//! construct), skip newlines at the documented positions, and report any
//! missing required piece in place while parsing continues.

use crate::recovery::STMT_RECOVERY;
use crate::Parser;
use rlang_diagnostic::ErrorCode;
use rlang_ir::{Element, NodeId, NodeKind, TokenKind};

use super::ANY_TIER;
use crate::ParseError;

impl<'a> Parser<'a> {
    /// `if nl* ( nl* cond nl* ) nl* then [nl* else nl* otherwise]`.
    ///
    /// The newlines before `else` are consumed only when an `else` actually
    /// follows them; otherwise they terminate the statement, so `else` on
    /// its own line still attaches to the preceding `if`. A dangling `else`
    /// binds to the nearest unmatched `if` because the inner `if`'s branch
    /// parse sees it first.
    pub(crate) fn parse_if(&mut self) -> NodeId {
        let mut children = Vec::new();
        self.bump(&mut children); // if
        self.parse_condition(&mut children);
        self.required_expression(ANY_TIER, &mut children); // then branch
        if self.at_else() {
            self.eat_newlines(&mut children);
            self.bump(&mut children); // else
            self.eat_newlines(&mut children);
            self.required_expression(ANY_TIER, &mut children);
        }
        self.finish(NodeKind::IfStatement, children)
    }

    fn at_else(&self) -> bool {
        self.cursor.check(TokenKind::Else)
            || (self.cursor.check(TokenKind::Newline)
                && self.cursor.peek_past_newlines() == TokenKind::Else)
    }

    /// `while nl* ( nl* cond nl* ) nl* body`.
    pub(crate) fn parse_while(&mut self) -> NodeId {
        let mut children = Vec::new();
        self.bump(&mut children); // while
        self.parse_condition(&mut children);
        self.required_expression(ANY_TIER, &mut children); // body
        self.finish(NodeKind::WhileStatement, children)
    }

    /// Shared `nl* ( nl* cond nl* ) nl*` tail of `if` and `while`.
    fn parse_condition(&mut self, children: &mut Vec<Element>) {
        self.eat_newlines(children);
        self.expect_in(TokenKind::LPar, children);
        self.eat_newlines(children);
        self.required_expression(ANY_TIER, children);
        self.eat_newlines(children);
        self.expect_in(TokenKind::RPar, children);
        self.eat_newlines(children);
    }

    /// `for nl* ( nl* ident in nl* seq ) nl* body`.
    ///
    /// The loop variable must be a bare identifier, not an expression.
    pub(crate) fn parse_for(&mut self) -> NodeId {
        let mut children = Vec::new();
        self.bump(&mut children); // for
        self.eat_newlines(&mut children);
        self.expect_in(TokenKind::LPar, &mut children);
        self.eat_newlines(&mut children);
        if self.cursor.check(TokenKind::Identifier) {
            let var = self.wrap_current_token(NodeKind::IdentifierExpression);
            children.push(Element::Node(var));
        } else {
            let error = ParseError::new(
                ErrorCode::E1004,
                format!(
                    "expected loop variable identifier, found {}",
                    self.cursor.current_kind().display_name()
                ),
                self.cursor.current_span(),
            );
            self.report(error);
        }
        self.expect_in(TokenKind::In, &mut children);
        self.eat_newlines(&mut children);
        self.required_expression(ANY_TIER, &mut children); // sequence
        self.expect_in(TokenKind::RPar, &mut children);
        self.eat_newlines(&mut children);
        self.required_expression(ANY_TIER, &mut children); // body
        self.finish(NodeKind::ForStatement, children)
    }

    /// `repeat nl* body`.
    pub(crate) fn parse_repeat(&mut self) -> NodeId {
        let mut children = Vec::new();
        self.bump(&mut children); // repeat
        self.eat_newlines(&mut children);
        self.required_expression(ANY_TIER, &mut children);
        self.finish(NodeKind::RepeatStatement, children)
    }

    /// `break` / `next`.
    pub(crate) fn parse_single_token_statement(&mut self, kind: NodeKind) -> NodeId {
        let mut children = Vec::new();
        self.bump(&mut children);
        self.finish(kind, children)
    }

    /// `{ sep* (expr sep+)* expr? }`.
    pub(crate) fn parse_block(&mut self) -> NodeId {
        let mut children = Vec::new();
        let open_span = self.cursor.current_span();
        self.bump(&mut children); // {
        self.parse_expression_list(&mut children, true);
        if self.cursor.check(TokenKind::RBrace) {
            self.bump(&mut children);
        } else if !self.cancelled {
            let error = ParseError::new(
                ErrorCode::E1003,
                "unclosed '{'",
                self.cursor.current_span(),
            )
            .with_context(format!("block opened at {open_span}"));
            self.report(error);
        }
        self.finish(NodeKind::BlockExpression, children)
    }

    /// Expression list shared by blocks and the whole input: expressions
    /// separated by one-or-more newlines or semicolons, trailing separator
    /// optional, empty list permitted.
    ///
    /// `in_block` stops the list at `}` (left for the caller to consume).
    pub(crate) fn parse_expression_list(&mut self, children: &mut Vec<Element>, in_block: bool) {
        loop {
            if self.check_cancelled() {
                return;
            }
            while self.cursor.check(TokenKind::Newline) || self.cursor.check(TokenKind::Semicolon)
            {
                self.bump(children);
            }
            if self.cursor.is_at_end() || (in_block && self.cursor.check(TokenKind::RBrace)) {
                return;
            }

            let before = self.cursor.position();
            match self.parse_expression(ANY_TIER) {
                Some(expr) => {
                    children.push(Element::Node(expr));
                    if !self.at_statement_boundary(in_block) && !self.cancelled {
                        let error = ParseError::new(
                            ErrorCode::E1005,
                            "expected newline or ';' between expressions",
                            self.cursor.current_span(),
                        );
                        self.report(error);
                    }
                }
                None => {
                    // Not the start of any expression: report the stray
                    // token and sweep to the next synchronizing point.
                    let error = ParseError::new(
                        ErrorCode::E1001,
                        format!(
                            "unexpected {}",
                            self.cursor.current_kind().display_name()
                        ),
                        self.cursor.current_span(),
                    );
                    self.report(error);
                    if self.cursor.check(TokenKind::RBrace) && !in_block {
                        // A '}' with no open block is itself a recovery
                        // token; consume it so the list keeps moving.
                        let id = self.cursor.current_id();
                        self.cursor.advance();
                        let node = self.error_node_for(id..id + 1);
                        children.push(Element::Node(node));
                    } else {
                        let swept = self.sweep_error(STMT_RECOVERY);
                        children.push(Element::Node(swept));
                    }
                }
            }
            if self.cursor.position() == before {
                // Neither branch consumed anything (recovery token was
                // already current): bail out rather than loop forever.
                debug_assert!(
                    in_block || self.cursor.is_at_end(),
                    "statement list made no progress"
                );
                return;
            }
        }
    }

    fn at_statement_boundary(&self, in_block: bool) -> bool {
        self.cursor.is_at_end()
            || self.cursor.check(TokenKind::Newline)
            || self.cursor.check(TokenKind::Semicolon)
            || (in_block && self.cursor.check(TokenKind::RBrace))
    }

    /// `( nl* expr nl* )`.
    pub(crate) fn parse_parenthesized(&mut self) -> NodeId {
        let mut children = Vec::new();
        self.bump(&mut children); // (
        self.eat_newlines(&mut children);
        self.required_expression(ANY_TIER, &mut children);
        self.eat_newlines(&mut children);
        self.expect_in(TokenKind::RPar, &mut children);
        self.finish(NodeKind::ParenthesizedExpression, children)
    }

    /// `function nl* (params) nl* body`.
    ///
    /// The body is gated at tier 9 so it absorbs assignments and everything
    /// looser: `function(x) x <- 1` keeps the assignment inside the body.
    pub(crate) fn parse_function(&mut self) -> NodeId {
        let mut children = Vec::new();
        self.bump(&mut children); // function
        self.eat_newlines(&mut children);
        if self.cursor.check(TokenKind::LPar) {
            let params = self.parse_parameter_list();
            children.push(Element::Node(params));
        } else {
            let error = self.cursor.make_expect_error(TokenKind::LPar);
            self.report(error);
        }
        self.eat_newlines(&mut children);
        self.required_expression(9, &mut children);
        self.finish(NodeKind::FunctionExpression, children)
    }

    /// `? topic`, `?? topic`, or `? keyword` — help lookup.
    ///
    /// The topic may be a bare keyword (`?if`, `?function`, `?NA_integer_`)
    /// since keywords are legal help subjects even though they are not
    /// expressions.
    pub(crate) fn parse_help(&mut self) -> NodeId {
        let mut children = Vec::new();
        self.bump(&mut children); // ?
        if self.cursor.check(TokenKind::Help)
            || (self.cursor.check(TokenKind::Newline)
                && self.cursor.peek_past_newlines() == TokenKind::Help)
        {
            self.eat_newlines(&mut children);
            self.bump(&mut children); // second ? of `??`
        }
        self.eat_newlines(&mut children);
        if HELP_KEYWORDS.contains(self.cursor.current_kind()) {
            self.bump(&mut children);
        } else {
            self.required_expression(ANY_TIER, &mut children);
        }
        self.finish(NodeKind::HelpExpression, children)
    }
}

/// Keywords that are legal as a bare help topic.
const HELP_KEYWORDS: crate::recovery::TokenSet = crate::recovery::TokenSet::new()
    .with(TokenKind::If)
    .with(TokenKind::Else)
    .with(TokenKind::While)
    .with(TokenKind::For)
    .with(TokenKind::In)
    .with(TokenKind::Repeat)
    .with(TokenKind::Function)
    .with(TokenKind::Break)
    .with(TokenKind::Next)
    .with(TokenKind::NaInteger)
    .with(TokenKind::NaReal)
    .with(TokenKind::NaComplex)
    .with(TokenKind::NaCharacter);
