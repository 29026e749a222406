//! Stack growth for recursive tree walks.
//!
//! Operator chains such as `x + x + ... + x` parse in a loop but produce a
//! tree as deep as the chain is long, so every recursive pass over a tree
//! (copying, deparsing, visiting, evaluating) wraps its recursion step in
//! [`ensure_sufficient_stack`]. On native targets `stacker` moves the
//! computation onto a fresh segment when the red zone is reached; on WASM
//! it is a plain call.

/// Remaining stack below which a new segment is allocated (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each new segment (1MB).
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
