//! Minimal lexer for tests.
//!
//! The parser consumes a [`TokenList`] produced elsewhere; this module gives
//! the tests a small hand-rolled scanner so fixtures can be written as source
//! text. It covers the full token alphabet the parser dispatches on but makes
//! no attempt at production-grade diagnostics: anything unrecognized becomes
//! an `Error` token.

use rlang_ir::{Span, TokenKind, TokenList};

/// Lex `source` into a token list ending in `Eof`.
///
/// Spaces, tabs, carriage returns, and `#` comments are dropped as trivia
/// (the gap-preserving reconstruction in `rlang_ir` reinserts them from the
/// source text). Newlines are real tokens.
pub(crate) fn lex(source: &str) -> TokenList {
    let bytes = source.as_bytes();
    let mut tokens = TokenList::new(source.to_owned());
    let mut pos = 0usize;
    // Open subscription brackets; `]]` closes as one token only when the
    // innermost opener was `[[`.
    let mut brackets: Vec<TokenKind> = Vec::new();

    while pos < bytes.len() {
        let start = pos;
        let b = bytes[pos];
        let kind = match b {
            b' ' | b'\t' | b'\r' => {
                pos += 1;
                continue;
            }
            b'#' => {
                while pos < bytes.len() && bytes[pos] != b'\n' {
                    pos += 1;
                }
                continue;
            }
            b'\n' => {
                pos += 1;
                TokenKind::Newline
            }
            b'"' | b'\'' => {
                pos += 1;
                let mut closed = false;
                while pos < bytes.len() {
                    match bytes[pos] {
                        b'\\' => pos = (pos + 2).min(bytes.len()),
                        c if c == b => {
                            pos += 1;
                            closed = true;
                            break;
                        }
                        _ => pos += 1,
                    }
                }
                if closed {
                    TokenKind::String
                } else {
                    TokenKind::Error
                }
            }
            b'`' => {
                pos += 1;
                let mut closed = false;
                while pos < bytes.len() {
                    if bytes[pos] == b'`' {
                        pos += 1;
                        closed = true;
                        break;
                    }
                    pos += 1;
                }
                if closed {
                    TokenKind::Identifier
                } else {
                    TokenKind::Error
                }
            }
            b'%' => {
                pos += 1;
                let mut closed = false;
                while pos < bytes.len() {
                    if bytes[pos] == b'%' {
                        pos += 1;
                        closed = true;
                        break;
                    }
                    pos += 1;
                }
                if closed {
                    TokenKind::InfixOp
                } else {
                    TokenKind::Error
                }
            }
            b'0'..=b'9' => lex_number(bytes, &mut pos),
            b'.' if bytes.get(pos + 1).is_some_and(u8::is_ascii_digit) => {
                lex_number(bytes, &mut pos)
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'.' => {
                while pos < bytes.len() && is_identifier_byte(bytes[pos]) {
                    pos += 1;
                }
                keyword_or_identifier(&source[start..pos])
            }
            b'<' => match (bytes.get(pos + 1), bytes.get(pos + 2)) {
                (Some(b'<'), Some(b'-')) => {
                    pos += 3;
                    TokenKind::LeftComplexAssign
                }
                (Some(b'-'), _) => {
                    pos += 2;
                    TokenKind::LeftAssign
                }
                (Some(b'='), _) => {
                    pos += 2;
                    TokenKind::Le
                }
                _ => {
                    pos += 1;
                    TokenKind::Lt
                }
            },
            b'-' => match (bytes.get(pos + 1), bytes.get(pos + 2)) {
                (Some(b'>'), Some(b'>')) => {
                    pos += 3;
                    TokenKind::RightComplexAssign
                }
                (Some(b'>'), _) => {
                    pos += 2;
                    TokenKind::RightAssign
                }
                _ => {
                    pos += 1;
                    TokenKind::Minus
                }
            },
            b'>' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    pos += 2;
                    TokenKind::Ge
                } else {
                    pos += 1;
                    TokenKind::Gt
                }
            }
            b'=' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    pos += 2;
                    TokenKind::EqEq
                } else {
                    pos += 1;
                    TokenKind::Eq
                }
            }
            b'!' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    pos += 2;
                    TokenKind::NotEq
                } else {
                    pos += 1;
                    TokenKind::Not
                }
            }
            b':' => match (bytes.get(pos + 1), bytes.get(pos + 2)) {
                (Some(b':'), Some(b':')) => {
                    pos += 3;
                    TokenKind::TripleColon
                }
                (Some(b':'), _) => {
                    pos += 2;
                    TokenKind::DoubleColon
                }
                (Some(b'='), _) => {
                    pos += 2;
                    TokenKind::LeftAssignOld
                }
                _ => {
                    pos += 1;
                    TokenKind::Colon
                }
            },
            b'&' => {
                if bytes.get(pos + 1) == Some(&b'&') {
                    pos += 2;
                    TokenKind::AndAnd
                } else {
                    pos += 1;
                    TokenKind::And
                }
            }
            b'|' => {
                if bytes.get(pos + 1) == Some(&b'|') {
                    pos += 2;
                    TokenKind::OrOr
                } else {
                    pos += 1;
                    TokenKind::Or
                }
            }
            b'[' => {
                if bytes.get(pos + 1) == Some(&b'[') {
                    pos += 2;
                    brackets.push(TokenKind::LDbracket);
                    TokenKind::LDbracket
                } else {
                    pos += 1;
                    brackets.push(TokenKind::LBracket);
                    TokenKind::LBracket
                }
            }
            b']' => {
                if bytes.get(pos + 1) == Some(&b']')
                    && brackets.last() == Some(&TokenKind::LDbracket)
                {
                    pos += 2;
                    brackets.pop();
                    TokenKind::RDbracket
                } else {
                    pos += 1;
                    brackets.pop();
                    TokenKind::RBracket
                }
            }
            b'+' => {
                pos += 1;
                TokenKind::Plus
            }
            b'*' => {
                pos += 1;
                TokenKind::Mult
            }
            b'/' => {
                pos += 1;
                TokenKind::Div
            }
            b'^' => {
                pos += 1;
                TokenKind::Exp
            }
            b'~' => {
                pos += 1;
                TokenKind::Tilde
            }
            b'?' => {
                pos += 1;
                TokenKind::Help
            }
            b'@' => {
                pos += 1;
                TokenKind::At
            }
            b'$' => {
                pos += 1;
                TokenKind::ListSubset
            }
            b'(' => {
                pos += 1;
                TokenKind::LPar
            }
            b')' => {
                pos += 1;
                TokenKind::RPar
            }
            b'{' => {
                pos += 1;
                TokenKind::LBrace
            }
            b'}' => {
                pos += 1;
                TokenKind::RBrace
            }
            b',' => {
                pos += 1;
                TokenKind::Comma
            }
            b';' => {
                pos += 1;
                TokenKind::Semicolon
            }
            _ => {
                pos += 1;
                TokenKind::Error
            }
        };
        tokens.push(kind, span(start, pos));
    }

    tokens.push(TokenKind::Eof, Span::point(to_u32(bytes.len())));
    tokens
}

fn lex_number(bytes: &[u8], pos: &mut usize) -> TokenKind {
    while *pos < bytes.len() && (bytes[*pos].is_ascii_digit() || bytes[*pos] == b'.') {
        *pos += 1;
    }
    if *pos < bytes.len() && (bytes[*pos] == b'e' || bytes[*pos] == b'E') {
        *pos += 1;
        if *pos < bytes.len() && (bytes[*pos] == b'+' || bytes[*pos] == b'-') {
            *pos += 1;
        }
        while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
            *pos += 1;
        }
    }
    match bytes.get(*pos) {
        Some(b'L') => {
            *pos += 1;
            TokenKind::Integer
        }
        Some(b'i') => {
            *pos += 1;
            TokenKind::Complex
        }
        _ => TokenKind::Numeric,
    }
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'.' || b == b'_'
}

fn keyword_or_identifier(text: &str) -> TokenKind {
    match text {
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "in" => TokenKind::In,
        "repeat" => TokenKind::Repeat,
        "function" => TokenKind::Function,
        "break" => TokenKind::Break,
        "next" => TokenKind::Next,
        "TRUE" => TokenKind::True,
        "FALSE" => TokenKind::False,
        "NULL" => TokenKind::Null,
        "NA" => TokenKind::Na,
        "NA_integer_" => TokenKind::NaInteger,
        "NA_real_" => TokenKind::NaReal,
        "NA_complex_" => TokenKind::NaComplex,
        "NA_character_" => TokenKind::NaCharacter,
        "Inf" => TokenKind::Inf,
        "NaN" => TokenKind::NaN,
        _ => TokenKind::Identifier,
    }
}

fn span(start: usize, end: usize) -> Span {
    Span::new(to_u32(start), to_u32(end))
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Lex and parse in one step, returning the tokens alongside the result so
/// tests can reconstruct source text and read token spans.
pub(crate) fn parse_source(source: &str) -> (TokenList, crate::ParseResult) {
    let tokens = lex(source);
    let result = crate::parse(&tokens);
    (tokens, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_assignment() {
        assert_eq!(
            kinds("x <- 1"),
            vec![
                TokenKind::Identifier,
                TokenKind::LeftAssign,
                TokenKind::Numeric,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_maximal_munch() {
        assert_eq!(
            kinds("a <<- b ->> c"),
            vec![
                TokenKind::Identifier,
                TokenKind::LeftComplexAssign,
                TokenKind::Identifier,
                TokenKind::RightComplexAssign,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("a:::b::c:=d:e"),
            vec![
                TokenKind::Identifier,
                TokenKind::TripleColon,
                TokenKind::Identifier,
                TokenKind::DoubleColon,
                TokenKind::Identifier,
                TokenKind::LeftAssignOld,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_double_bracket_is_context_sensitive() {
        // The `]]` closer pairs with `[[` only.
        assert_eq!(
            kinds("x[[1]]"),
            vec![
                TokenKind::Identifier,
                TokenKind::LDbracket,
                TokenKind::Numeric,
                TokenKind::RDbracket,
                TokenKind::Eof,
            ]
        );
        // `x[y[1]]`: both closers are single brackets.
        assert_eq!(
            kinds("x[y[1]]"),
            vec![
                TokenKind::Identifier,
                TokenKind::LBracket,
                TokenKind::Identifier,
                TokenKind::LBracket,
                TokenKind::Numeric,
                TokenKind::RBracket,
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_numbers() {
        assert_eq!(
            kinds("1 2L 3i 4.5 1e10 .5"),
            vec![
                TokenKind::Numeric,
                TokenKind::Integer,
                TokenKind::Complex,
                TokenKind::Numeric,
                TokenKind::Numeric,
                TokenKind::Numeric,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_keywords_and_na_variants() {
        assert_eq!(
            kinds("if NA NA_integer_ NaN Inf foo.bar ..."),
            vec![
                TokenKind::If,
                TokenKind::Na,
                TokenKind::NaInteger,
                TokenKind::NaN,
                TokenKind::Inf,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_infix_and_strings() {
        assert_eq!(
            kinds("a %in% \"b\\\"c\" # trailing comment"),
            vec![
                TokenKind::Identifier,
                TokenKind::InfixOp,
                TokenKind::String,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_unterminated_string_is_error() {
        assert_eq!(kinds("\"oops"), vec![TokenKind::Error, TokenKind::Eof]);
    }

    #[test]
    fn test_lex_spans_cover_token_text() {
        let tokens = lex("x <- 1");
        assert_eq!(tokens.text(0), "x");
        assert_eq!(tokens.text(1), "<-");
        assert_eq!(tokens.text(2), "1");
    }
}
