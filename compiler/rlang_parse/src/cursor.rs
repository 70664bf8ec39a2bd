//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, lookahead, and consumption methods.

use super::ParseError;
use rlang_diagnostic::ErrorCode;
use rlang_ir::{Span, Token, TokenId, TokenKind, TokenList};

/// Cursor for navigating tokens.
///
/// Provides methods for accessing, consuming, and checking tokens during
/// parsing. Tracks current position in the token stream.
///
/// Includes a `tags` slice for fast discriminant checks: a single byte load
/// per check instead of loading the full token.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    /// Dense array of discriminant tags, parallel to `tokens`.
    tags: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of the token stream.
    pub fn new(tokens: &'a TokenList) -> Self {
        debug_assert!(
            tokens
                .get(tokens.len().wrapping_sub(1))
                .is_some_and(|t| t.kind.is_eof()),
            "token stream must end with Eof"
        );
        Cursor {
            tokens,
            tags: tokens.tags(),
            pos: 0,
        }
    }

    /// Get the total number of tokens in the stream.
    #[inline]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Get the current position in the token stream.
    ///
    /// Used for progress tracking - compare positions before and after
    /// parsing to determine if tokens were consumed.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the current token.
    ///
    /// Invariant: cursor position is always valid (`0..tokens.len()`).
    /// The last token is always EOF.
    #[inline]
    pub fn current(&self) -> &Token {
        debug_assert!(
            self.pos < self.tokens.len(),
            "cursor position out of bounds"
        );
        &self.tokens[self.pos]
    }

    /// Get the current token's kind.
    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Get the current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Get the current token's index, for recording it as a tree leaf.
    #[inline]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "token count cannot exceed u32::MAX for any input the span type admits"
    )]
    pub fn current_id(&self) -> TokenId {
        self.pos as TokenId
    }

    /// Get the previous token's span.
    #[inline]
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    /// Check if at end of token stream.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.tags[self.pos] == TokenKind::Eof.discriminant_index()
    }

    /// Check if the current token matches the given kind.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.tags[self.pos] == kind.discriminant_index()
    }

    /// Peek at the next token's kind (one-token lookahead).
    /// Returns `TokenKind::Eof` if at the end of the stream.
    #[inline]
    pub fn peek_next_kind(&self) -> TokenKind {
        if self.pos + 1 < self.tokens.len() {
            self.tokens[self.pos + 1].kind
        } else {
            TokenKind::Eof
        }
    }

    /// Check if the next token (lookahead) matches the given kind.
    #[inline]
    pub fn next_is(&self, kind: TokenKind) -> bool {
        self.pos + 1 < self.tags.len() && self.tags[self.pos + 1] == kind.discriminant_index()
    }

    /// First non-newline kind at or after the current position.
    ///
    /// Used where newlines are transparently skippable only when a specific
    /// token follows (`else` after a branch, `|`/`&` continuation lines).
    pub fn peek_past_newlines(&self) -> TokenKind {
        let mut pos = self.pos;
        let newline = TokenKind::Newline.discriminant_index();
        while pos < self.tags.len() && self.tags[pos] == newline {
            pos += 1;
        }
        if pos < self.tokens.len() {
            self.tokens[pos].kind
        } else {
            TokenKind::Eof
        }
    }

    /// Check if the current position starts a named argument: an identifier
    /// or string followed by `=` (never `==`, which lexes as one token).
    pub fn is_named_argument_start(&self) -> bool {
        (self.check(TokenKind::Identifier) || self.check(TokenKind::String))
            && self.next_is(TokenKind::Eq)
    }

    /// Check if the current position starts a namespace access:
    /// an identifier followed by `::` or `:::`.
    pub fn is_namespace_access_start(&self) -> bool {
        self.check(TokenKind::Identifier)
            && (self.next_is(TokenKind::DoubleColon) || self.next_is(TokenKind::TripleColon))
    }

    /// Advance to the next token and return the consumed token.
    ///
    /// # Safety invariant
    ///
    /// The lexer always appends an EOF token, and grammar rules always check
    /// the current token kind before calling `advance()`. This means the
    /// parser can never advance past the last token. The unconditional
    /// increment avoids a branch on every token consumption.
    #[inline]
    pub fn advance(&mut self) -> &Token {
        let current = self.pos;
        debug_assert!(
            self.pos < self.tokens.len(),
            "advance past end of token stream"
        );
        self.pos += 1;
        &self.tokens[current]
    }

    /// Expect the current token to be of the given kind, advance and return it.
    /// Returns an error if the token kind doesn't match.
    ///
    /// Split into inline happy path + `#[cold]` error path so that
    /// `format!()` allocations don't prevent LLVM from inlining the fast case.
    #[inline]
    pub fn expect(&mut self, kind: TokenKind) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.make_expect_error(kind))
        }
    }

    /// Build the error for a failed `expect()` call.
    ///
    /// Separated as `#[cold]` so the `format!()` allocation doesn't
    /// prevent LLVM from inlining the hot `expect()` fast path.
    #[cold]
    #[inline(never)]
    pub(crate) fn make_expect_error(&self, kind: TokenKind) -> ParseError {
        ParseError::new(
            ErrorCode::E1001,
            format!(
                "expected {}, found {}",
                kind.display_name(),
                self.current_kind().display_name()
            ),
            self.current_span(),
        )
        .with_context(format!("expected {}", kind.display_name()))
    }
}
