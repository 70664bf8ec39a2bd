//! Recursive descent parser for R source code.
//!
//! The grammar is resolved by precedence climbing over a 30-tier operator
//! table rather than one grammar rule per precedence level. The output is a
//! lossless [`SyntaxTree`]: every token of the input appears as a leaf of
//! exactly one node, in source order, so the original text can be
//! reconstructed from the tree alone.
//!
//! Parsing is total. Errors never abort: the parser records a diagnostic,
//! patches the tree with an error node, and continues, so even badly broken
//! input yields a tree covering all of it.
//!
//! # Example
//! ```ignore
//! let result = rlang_parse::parse(&tokens);
//! for error in &result.errors {
//!     eprintln!("{error}");
//! }
//! let root = result.tree.root();
//! ```

mod cursor;
mod grammar;
mod recovery;
#[cfg(test)]
mod testing;

pub use cursor::Cursor;
pub use recovery::{synchronize, TokenSet, LIST_RECOVERY, STMT_RECOVERY};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rlang_diagnostic::{Diagnostic, ErrorCode};
use rlang_ir::{Element, NodeKind, Span, SyntaxTree, TokenList};
use tracing::debug;

/// Maximum expression nesting depth before the parser refuses to recurse
/// further. Deep nesting past this point almost always means pathological or
/// generated input; the limit keeps worst-case time and stack bounded.
pub(crate) const MAX_EXPR_DEPTH: u32 = 1024;

/// Cooperative cancellation handle for a parse.
///
/// Cloneable and thread-safe: hand one clone to the parser via
/// [`parse_with_cancellation`] and keep another to flip from a different
/// thread. The parser polls it at expression entry and between statements,
/// so cancellation latency is a few tokens at most.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A single parse error, tied to a span of the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    /// Optional secondary note, e.g. where an unclosed delimiter was opened.
    pub context: Option<String>,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            context: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Render as a diagnostic for reporting.
    #[must_use]
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code)
            .with_message(self.message.as_str())
            .with_label(self.span, self.context.as_deref().unwrap_or("here"))
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} at {}", self.code, self.message, self.span)
    }
}

/// The outcome of a parse: always a tree, plus whatever went wrong.
#[derive(Debug)]
pub struct ParseResult {
    pub tree: SyntaxTree,
    pub errors: Vec<ParseError>,
    /// True when the parse stopped early because its [`CancelToken`] fired.
    pub cancelled: bool,
}

impl ParseResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse a token stream into a syntax tree.
///
/// The stream must end with an `Eof` token. Never fails: syntax errors are
/// collected in the result alongside the (repaired) tree.
#[must_use]
pub fn parse(tokens: &TokenList) -> ParseResult {
    Parser::new(tokens, None).parse_root()
}

/// Like [`parse`], but polls `cancel` and stops early once it fires.
///
/// A cancelled parse still returns a tree covering the whole input: tokens
/// not reached before cancellation are swept into a trailing error node.
#[must_use]
pub fn parse_with_cancellation(tokens: &TokenList, cancel: CancelToken) -> ParseResult {
    Parser::new(tokens, Some(cancel)).parse_root()
}

/// Parser state. Grammar rules live in the `grammar` module as `impl`
/// blocks on this type.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    tokens: &'a TokenList,
    tree: SyntaxTree,
    errors: Vec<ParseError>,
    /// Current expression nesting depth, bounded by [`MAX_EXPR_DEPTH`].
    depth: u32,
    depth_limit_reported: bool,
    cancel: Option<CancelToken>,
    cancelled: bool,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a TokenList, cancel: Option<CancelToken>) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            tokens,
            tree: SyntaxTree::new(),
            errors: Vec::new(),
            depth: 0,
            depth_limit_reported: false,
            cancel,
            cancelled: false,
        }
    }

    /// Parse the whole input as a top-level expression list.
    fn parse_root(mut self) -> ParseResult {
        debug!(tokens = self.cursor.token_count(), "parse start");
        let mut children = Vec::new();
        self.parse_expression_list(&mut children, false);

        // Whatever is left (after cancellation, or recovery giving up) is
        // swept into one trailing error node so the tree still covers the
        // full input.
        if !self.cursor.is_at_end() {
            let start = self.cursor.current_id();
            while !self.cursor.is_at_end() {
                self.cursor.advance();
            }
            let node = self.error_node_for(start..self.cursor.current_id());
            children.push(Element::Node(node));
        }

        let end = self.tokens[self.tokens.len() - 1].span.end;
        let root = self.tree.alloc(NodeKind::Root, Span::new(0, end), children);
        self.tree.set_root(root);
        debug!(
            errors = self.errors.len(),
            cancelled = self.cancelled,
            "parse done"
        );
        ParseResult {
            tree: self.tree,
            errors: self.errors,
            cancelled: self.cancelled,
        }
    }

    /// Record an error. After cancellation the tree keeps getting patched
    /// but no further diagnostics accumulate.
    pub(crate) fn report(&mut self, error: ParseError) {
        if !self.cancelled {
            self.errors.push(error);
        }
    }

    /// Poll the cancellation token. The first positive poll records a
    /// single diagnostic; subsequent polls just answer true.
    pub(crate) fn check_cancelled(&mut self) -> bool {
        if self.cancelled {
            return true;
        }
        let Some(cancel) = &self.cancel else {
            return false;
        };
        if cancel.is_cancelled() {
            self.errors.push(ParseError::new(
                ErrorCode::E9002,
                "parse cancelled",
                self.cursor.current_span(),
            ));
            self.cancelled = true;
            return true;
        }
        false
    }
}
