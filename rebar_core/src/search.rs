//! # Catalog Search
//!
//! First-fit search over ordered discrete catalogs. Every selection stage of
//! the pipeline is "walk these lists in this order and take the first
//! combination that works" - the caller owns the ordering, so tie-breaks are
//! explicit at each call site rather than buried in loop nesting.
//!
//! Nesting is outer-to-inner in argument order: `first_fit3(a, b, c, ..)`
//! tries every `c` for the first `b` of the first `a` before moving on.
//!
//! ```rust
//! use rebar_core::search::first_fit2;
//!
//! // Smallest diameter first, then widest spacing first
//! let hit = first_fit2(&[12, 16], &[250, 200, 150], |d, s| d * 1000 / s >= 80);
//! assert_eq!(hit, Some((12, 150)));
//! ```

/// First item satisfying `accept`
pub fn first_fit<A: Copy>(outer: &[A], mut accept: impl FnMut(A) -> bool) -> Option<A> {
    outer.iter().copied().find(|&a| accept(a))
}

/// First `(a, b)` pair satisfying `accept`, with `a` as the outer loop
pub fn first_fit2<A: Copy, B: Copy>(
    outer: &[A],
    inner: &[B],
    mut accept: impl FnMut(A, B) -> bool,
) -> Option<(A, B)> {
    for &a in outer {
        for &b in inner {
            if accept(a, b) {
                return Some((a, b));
            }
        }
    }
    None
}

/// First `(a, b, c)` triple satisfying `accept`, with `a` outermost
pub fn first_fit3<A: Copy, B: Copy, C: Copy>(
    outer: &[A],
    middle: &[B],
    inner: &[C],
    mut accept: impl FnMut(A, B, C) -> bool,
) -> Option<(A, B, C)> {
    for &a in outer {
        for &b in middle {
            for &c in inner {
                if accept(a, b, c) {
                    return Some((a, b, c));
                }
            }
        }
    }
    None
}
