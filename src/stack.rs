//! Stack growth for the recursive tree walkers.
//!
//! Parsing, resolving and evaluating all recurse once per nesting level, and
//! a Lox call adds several Rust frames on top.  Deep but valid programs (a
//! recursive function ten thousand calls deep, say) would otherwise exhaust
//! the thread's stack and abort the process.

/// Keep at least this much stack free before entering another level.
const RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated stack segment.
const SEGMENT: usize = 2 * 1024 * 1024;

/// Run `f`, first switching to a new stack segment if the current one is
/// nearly used up.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT, f)
}
