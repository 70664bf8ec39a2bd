//! Core data types for the R parser:
//! - Spans for source locations
//! - Tokens and `TokenList` for lexer output
//! - Node kinds and the arena-backed syntax tree
//!
//! # Design Philosophy
//!
//! - **Fieldless tokens**: a token is a kind plus a span; its text is the
//!   source slice under the span. No interner, no payloads.
//! - **Flatten everything**: nodes live in one arena, referenced by
//!   `NodeId(u32)` indices rather than boxed children.
//! - **Lossless trees**: every consumed token is a child of exactly one
//!   node, in source order, so the tree reproduces the input byte-for-byte.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod node;
mod span;
mod token;
mod tree;

pub use node::NodeKind;
pub use span::{Span, SpanError};
pub use token::{Token, TokenId, TokenKind, TokenList};
pub use tree::{Element, Node, NodeId, SyntaxTree};
