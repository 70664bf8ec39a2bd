//! Stack safety utilities for deep recursion.
//!
//! Deeply nested input (parentheses, chained operators) drives the parser's
//! recursion depth linear in input size. Wrapping the recursive entry points
//! with [`ensure_sufficient_stack`] grows the stack on demand instead of
//! overflowing it.
//!
//! # Platform Support
//!
//! - **Native targets**: uses the `stacker` crate to grow the stack on demand.
//! - **WASM targets**: no-op passthrough (WASM has its own stack management).

/// Minimum stack space to keep available (100KB red zone).
///
/// If less than this amount remains, the stack is grown before recursing.
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
///
/// If the remaining stack is below the red zone threshold, this allocates
/// additional stack space before calling `f`.
///
/// ```text
/// fn parse_expression(&mut self, gate: i8) -> Option<NodeId> {
///     ensure_sufficient_stack(|| {
///         // ... recursive parsing logic ...
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
