//! Error recovery for the parser.
//!
//! Provides token sets and synchronization for continuing parsing after
//! errors. Uses bitset-based O(1) membership testing.

use super::cursor::Cursor;
use rlang_ir::{TokenId, TokenKind};

/// A set of token kinds using bitset representation for O(1) membership
/// testing.
///
/// Each bit in the u128 corresponds to a `TokenKind` discriminant index;
/// all discriminants are < 128 by a compile-time assertion in `rlang_ir`.
///
/// # Example
/// ```ignore
/// const STMT_RECOVERY: TokenSet = TokenSet::new()
///     .with(TokenKind::Newline)
///     .with(TokenKind::Semicolon);
///
/// if STMT_RECOVERY.contains(TokenKind::Newline) {
///     // O(1) lookup
/// }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    /// Create an empty token set.
    #[inline]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Create a token set containing a single token kind.
    #[inline]
    pub const fn single(kind: TokenKind) -> Self {
        Self(1u128 << kind.discriminant_index())
    }

    /// Add a token kind to this set (builder pattern for const contexts).
    #[inline]
    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        Self(self.0 | (1u128 << kind.discriminant_index()))
    }

    /// Union of two token sets.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Intersection of two token sets.
    #[inline]
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Check if this set contains a token kind.
    #[inline]
    pub const fn contains(&self, kind: TokenKind) -> bool {
        (self.0 & (1u128 << kind.discriminant_index())) != 0
    }

    /// Check if this set is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Count the number of token kinds in this set.
    #[inline]
    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }
}

impl Default for TokenSet {
    fn default() -> Self {
        Self::new()
    }
}

// Pre-defined token sets for common recovery scenarios.
// These are computed at compile time using const fn.

/// Recovery set for statement boundaries: skip to the next separator or the
/// end of the enclosing block.
pub const STMT_RECOVERY: TokenSet = TokenSet::new()
    .with(TokenKind::Newline)
    .with(TokenKind::Semicolon)
    .with(TokenKind::RBrace)
    .with(TokenKind::Eof);

/// Recovery set for list interiors (argument, parameter, and subscription
/// lists): skip to the next slot or a plausible list/statement end. The
/// closing delimiter of the enclosing list is added at the call site.
pub const LIST_RECOVERY: TokenSet = TokenSet::new()
    .with(TokenKind::Comma)
    .with(TokenKind::RBrace)
    .with(TokenKind::Semicolon)
    .with(TokenKind::Eof);

/// Advance the cursor until reaching a token in the recovery set or EOF.
///
/// Returns the half-open range of token indices that were skipped; the
/// caller wraps them in an error node so the tree keeps covering the input.
pub fn synchronize(cursor: &mut Cursor<'_>, recovery: TokenSet) -> std::ops::Range<TokenId> {
    let start = cursor.current_id();
    while !cursor.is_at_end() && !recovery.contains(cursor.current_kind()) {
        cursor.advance();
    }
    start..cursor.current_id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::lex;

    #[test]
    fn test_token_set_empty() {
        let set = TokenSet::new();
        assert!(set.is_empty());
        assert_eq!(set.count(), 0);
        assert!(!set.contains(TokenKind::Comma));
    }

    #[test]
    fn test_token_set_single() {
        let set = TokenSet::single(TokenKind::Comma);
        assert!(!set.is_empty());
        assert_eq!(set.count(), 1);
        assert!(set.contains(TokenKind::Comma));
        assert!(!set.contains(TokenKind::RPar));
    }

    #[test]
    fn test_token_set_with() {
        let set = TokenSet::new()
            .with(TokenKind::Comma)
            .with(TokenKind::RPar)
            .with(TokenKind::Eof);

        assert_eq!(set.count(), 3);
        assert!(set.contains(TokenKind::Comma));
        assert!(set.contains(TokenKind::RPar));
        assert!(set.contains(TokenKind::Eof));
        assert!(!set.contains(TokenKind::Plus));
    }

    #[test]
    fn test_token_set_union() {
        let set1 = TokenSet::new().with(TokenKind::Comma).with(TokenKind::RPar);
        let set2 = TokenSet::new().with(TokenKind::Eof).with(TokenKind::RPar);

        let union = set1.union(set2);
        assert_eq!(union.count(), 3);
        assert!(union.contains(TokenKind::Comma));
        assert!(union.contains(TokenKind::RPar));
        assert!(union.contains(TokenKind::Eof));
    }

    #[test]
    fn test_token_set_intersection() {
        let set1 = TokenSet::new().with(TokenKind::Comma).with(TokenKind::RPar);
        let set2 = TokenSet::new().with(TokenKind::Eof).with(TokenKind::RPar);

        let intersection = set1.intersection(set2);
        assert_eq!(intersection.count(), 1);
        assert!(intersection.contains(TokenKind::RPar));
        assert!(!intersection.contains(TokenKind::Comma));
    }

    #[test]
    fn test_const_token_sets() {
        // Verify const token sets are computed at compile time
        const TEST_SET: TokenSet = TokenSet::new()
            .with(TokenKind::Plus)
            .with(TokenKind::Minus);

        assert!(TEST_SET.contains(TokenKind::Plus));
        assert!(TEST_SET.contains(TokenKind::Minus));
        assert!(!TEST_SET.contains(TokenKind::Mult));
    }

    #[test]
    fn test_stmt_recovery_contains() {
        assert!(STMT_RECOVERY.contains(TokenKind::Newline));
        assert!(STMT_RECOVERY.contains(TokenKind::Semicolon));
        assert!(STMT_RECOVERY.contains(TokenKind::RBrace));
        assert!(STMT_RECOVERY.contains(TokenKind::Eof));
        assert!(!STMT_RECOVERY.contains(TokenKind::Plus));
    }

    #[test]
    fn test_synchronize_skips_to_separator() {
        let tokens = lex("] ] ;\nx");
        let mut cursor = Cursor::new(&tokens);

        let skipped = synchronize(&mut cursor, STMT_RECOVERY);
        assert_eq!(skipped, 0..2); // the two stray ']'
        assert!(cursor.check(TokenKind::Semicolon));
    }

    #[test]
    fn test_synchronize_at_recovery_token_is_empty() {
        let tokens = lex(";");
        let mut cursor = Cursor::new(&tokens);

        let skipped = synchronize(&mut cursor, STMT_RECOVERY);
        assert!(skipped.is_empty());
        assert!(cursor.check(TokenKind::Semicolon));
    }

    #[test]
    fn test_synchronize_reaches_eof() {
        let tokens = lex("a b c");
        let mut cursor = Cursor::new(&tokens);

        let skipped = synchronize(&mut cursor, TokenSet::single(TokenKind::Comma));
        assert_eq!(skipped, 0..3);
        assert!(cursor.is_at_end());
    }
}
