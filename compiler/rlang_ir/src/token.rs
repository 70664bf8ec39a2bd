//! Token types for the R token stream.
//!
//! The parser consumes tokens produced by an external lexer. A token is a
//! kind plus a span; its text is the source slice under the span, so kinds
//! carry no payloads and a token is 12 bytes.

use super::Span;
use std::fmt;
use std::ops::Index;

/// A token with its span in the source.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// Create a dummy token for testing.
    pub fn dummy(kind: TokenKind) -> Self {
        Token {
            kind,
            span: Span::DUMMY,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Index of a token in a [`TokenList`].
pub type TokenId = u32;

/// Token kinds for the R lexical alphabet.
///
/// Discriminants are arranged in contiguous semantic ranges with gaps for
/// future expansion:
///
/// | Range   | Category    |
/// |---------|-------------|
/// | 0-9     | Terminals   |
/// | 10-29   | Keywords    |
/// | 30-49   | Punctuation |
/// | 50-89   | Operators   |
/// | 120-127 | Special     |
///
/// # Invariant
///
/// All discriminants must be < 128 so the parser's `u128` token bitsets
/// cover the whole alphabet.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum TokenKind {
    // === Terminals (0-9) ===
    Identifier = 0,
    Integer = 1,
    Numeric = 2,
    Complex = 3,
    String = 4,
    /// User-defined infix operator: `%op%`, `%in%`, `%%`, ...
    InfixOp = 5,

    // === Keywords (10-29) ===
    If = 10,
    Else = 11,
    While = 12,
    For = 13,
    In = 14,
    Repeat = 15,
    Function = 16,
    Break = 17,
    Next = 18,
    True = 19,
    False = 20,
    Null = 21,
    Na = 22,
    NaInteger = 23,
    NaReal = 24,
    NaComplex = 25,
    NaCharacter = 26,
    Inf = 27,
    NaN = 28,

    // === Punctuation (30-49) ===
    LPar = 30,      // (
    RPar = 31,      // )
    LBrace = 32,    // {
    RBrace = 33,    // }
    LBracket = 34,  // [
    RBracket = 35,  // ]
    LDbracket = 36, // [[
    RDbracket = 37, // ]]
    Comma = 38,     // ,
    Semicolon = 39, // ;

    // === Operators (50-89) ===
    LeftAssign = 50,         // <-
    LeftComplexAssign = 51,  // <<-
    LeftAssignOld = 52,      // :=
    RightAssign = 53,        // ->
    RightComplexAssign = 54, // ->>
    Eq = 55,                 // =
    Tilde = 56,              // ~
    Or = 57,                 // |
    OrOr = 58,               // ||
    And = 59,                // &
    AndAnd = 60,             // &&
    Not = 61,                // !
    Gt = 62,                 // >
    Ge = 63,                 // >=
    Lt = 64,                 // <
    Le = 65,                 // <=
    EqEq = 66,               // ==
    NotEq = 67,              // !=
    Plus = 68,               // +
    Minus = 69,              // -
    Mult = 70,               // *
    Div = 71,                // /
    Exp = 72,                // ^
    Colon = 73,              // :
    DoubleColon = 74,        // ::
    TripleColon = 75,        // :::
    ListSubset = 76,         // $
    At = 77,                 // @
    Help = 78,               // ?

    // === Special (120-127) ===
    Newline = 121,
    /// Unrecognized input from the lexer.
    Error = 122,
    Eof = 127,
}

// Compile-time assertion: all discriminants fit in 7 bits (< 128).
// Required for the parser's u128 token bitsets.
const _: () = assert!(TokenKind::MAX_DISCRIMINANT < 128);

impl TokenKind {
    /// Maximum discriminant value across all variants.
    ///
    /// Must be < 128 for the `u128` token bitsets. Update when adding
    /// variants past `Eof`.
    pub const MAX_DISCRIMINANT: u8 = Self::Eof as u8;

    /// Get the discriminant as a bitset index.
    #[inline]
    pub const fn discriminant_index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn is_eof(self) -> bool {
        matches!(self, TokenKind::Eof)
    }

    /// Get a human-readable name for this kind, for error messages.
    pub const fn display_name(self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Integer => "integer literal",
            TokenKind::Numeric => "numeric literal",
            TokenKind::Complex => "complex literal",
            TokenKind::String => "string literal",
            TokenKind::InfixOp => "infix operator",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::While => "'while'",
            TokenKind::For => "'for'",
            TokenKind::In => "'in'",
            TokenKind::Repeat => "'repeat'",
            TokenKind::Function => "'function'",
            TokenKind::Break => "'break'",
            TokenKind::Next => "'next'",
            TokenKind::True => "'TRUE'",
            TokenKind::False => "'FALSE'",
            TokenKind::Null => "'NULL'",
            TokenKind::Na => "'NA'",
            TokenKind::NaInteger => "'NA_integer_'",
            TokenKind::NaReal => "'NA_real_'",
            TokenKind::NaComplex => "'NA_complex_'",
            TokenKind::NaCharacter => "'NA_character_'",
            TokenKind::Inf => "'Inf'",
            TokenKind::NaN => "'NaN'",
            TokenKind::LPar => "'('",
            TokenKind::RPar => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LDbracket => "'[['",
            TokenKind::RDbracket => "']]'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::LeftAssign => "'<-'",
            TokenKind::LeftComplexAssign => "'<<-'",
            TokenKind::LeftAssignOld => "':='",
            TokenKind::RightAssign => "'->'",
            TokenKind::RightComplexAssign => "'->>'",
            TokenKind::Eq => "'='",
            TokenKind::Tilde => "'~'",
            TokenKind::Or => "'|'",
            TokenKind::OrOr => "'||'",
            TokenKind::And => "'&'",
            TokenKind::AndAnd => "'&&'",
            TokenKind::Not => "'!'",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Mult => "'*'",
            TokenKind::Div => "'/'",
            TokenKind::Exp => "'^'",
            TokenKind::Colon => "':'",
            TokenKind::DoubleColon => "'::'",
            TokenKind::TripleColon => "':::'",
            TokenKind::ListSubset => "'$'",
            TokenKind::At => "'@'",
            TokenKind::Help => "'?'",
            TokenKind::Newline => "newline",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A token stream together with the source it was lexed from.
///
/// # Lexer Contract
///
/// Tokens are in source order with non-overlapping spans, and the list ends
/// with exactly one `Eof` token. The parser relies on the `Eof` sentinel to
/// avoid bounds checks on every advance.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct TokenList {
    source: String,
    tokens: Vec<Token>,
    /// Dense array of discriminant indices, parallel to `tokens`.
    tags: Vec<u8>,
}

impl TokenList {
    /// Create an empty token list over the given source.
    pub fn new(source: impl Into<String>) -> Self {
        TokenList {
            source: source.into(),
            tokens: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Append a token.
    pub fn push(&mut self, kind: TokenKind, span: Span) {
        self.tokens.push(Token::new(kind, span));
        self.tags.push(kind.discriminant_index());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// The dense discriminant-tag array, parallel to the token vector.
    #[inline]
    pub fn tags(&self) -> &[u8] {
        &self.tags
    }

    /// The full source text.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source text of the token at `id`.
    #[inline]
    pub fn text(&self, id: TokenId) -> &str {
        &self.source[self.tokens[id as usize].span.to_range()]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}

impl Index<usize> for TokenList {
    type Output = Token;

    #[inline]
    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

// Size assertion: kind (1 byte) + padding + span (8 bytes).
#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Token;
    crate::static_assert_size!(Token, 12);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_discriminants_fit_bitset() {
        assert!(TokenKind::MAX_DISCRIMINANT < 128);
        assert_eq!(TokenKind::Eof.discriminant_index(), 127);
        assert_eq!(TokenKind::Identifier.discriminant_index(), 0);
    }

    #[test]
    fn test_discriminants_distinct() {
        // Spot-check the range boundaries stay distinct.
        let kinds = [
            TokenKind::Identifier,
            TokenKind::InfixOp,
            TokenKind::If,
            TokenKind::NaN,
            TokenKind::LPar,
            TokenKind::Semicolon,
            TokenKind::LeftAssign,
            TokenKind::Help,
            TokenKind::Newline,
            TokenKind::Error,
            TokenKind::Eof,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a.discriminant_index(), b.discriminant_index());
            }
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(TokenKind::LeftAssign.display_name(), "'<-'");
        assert_eq!(TokenKind::Identifier.display_name(), "identifier");
        assert_eq!(format!("{}", TokenKind::RDbracket), "']]'");
    }

    #[test]
    fn test_token_list_text() {
        let mut tokens = TokenList::new("x <- 42");
        tokens.push(TokenKind::Identifier, Span::new(0, 1));
        tokens.push(TokenKind::LeftAssign, Span::new(2, 4));
        tokens.push(TokenKind::Numeric, Span::new(5, 7));
        tokens.push(TokenKind::Eof, Span::point(7));

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens.text(0), "x");
        assert_eq!(tokens.text(1), "<-");
        assert_eq!(tokens.text(2), "42");
        assert_eq!(tokens[1].kind, TokenKind::LeftAssign);
    }

    #[test]
    fn test_token_list_tags_parallel() {
        let mut tokens = TokenList::new("a+b");
        tokens.push(TokenKind::Identifier, Span::new(0, 1));
        tokens.push(TokenKind::Plus, Span::new(1, 2));
        tokens.push(TokenKind::Identifier, Span::new(2, 3));
        tokens.push(TokenKind::Eof, Span::point(3));

        assert_eq!(tokens.tags().len(), tokens.len());
        assert_eq!(tokens.tags()[1], TokenKind::Plus.discriminant_index());
    }

    #[test]
    fn test_token_debug() {
        let token = Token::new(TokenKind::Plus, Span::new(3, 4));
        assert_eq!(format!("{token:?}"), "Plus @ 3..4");
    }
}
