//! Stack growth for the recursive productions.
//!
//! Every production that can recurse into itself runs through
//! [`Parser::with_nesting_guard`](crate::parser::Parser), which calls
//! [`ensure_sufficient_stack`]. The red zone covers the deepest chain of
//! frames between two guarded productions (a type argument back into
//! `parse_type` is the longest), so parsing never depends on the size of
//! the caller's thread stack.

/// Grow the stack when less than this remains.
const RED_ZONE: usize = 256 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 2 * 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(n: u32) -> u32 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
    }

    #[test]
    fn test_deep_recursion_on_a_small_thread() {
        let result = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(|| depth(200_000))
            .expect("spawn")
            .join()
            .expect("no overflow");
        assert_eq!(result, 200_000);
    }
}
