//! Stack growth for the recursive fingerprint printer and renderer.
//!
//! Value graphs can nest arbitrarily deep (a linked list of a million nodes
//! is one struct inside the next), so every recursive step goes through
//! [`ensure_sufficient_stack`]. On native targets the stack grows on demand
//! via `stacker`; on wasm32 the closure is called directly.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment.
const GROWTH: usize = 1024 * 1024;

/// Run `f`, first growing the stack if it is close to exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
