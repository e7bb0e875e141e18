//! Priority ordering
//!
//! Total order over bubbles: boosted before normal, then score descending,
//! remaining ties stable in slice order.

use std::cmp::Ordering;

use super::bubble::Bubble;

/// Comparator behind the priority order
#[inline]
pub fn priority_cmp(a: &Bubble, b: &Bubble) -> Ordering {
    a.tier.cmp(&b.tier).then(b.score.cmp(&a.score))
}

/// Indices of `bubbles` in priority order
///
/// Pure, O(n log n); a stable sort keeps insertion order for same-tier,
/// same-score bubbles.
pub fn priority_order(bubbles: &[Bubble]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..bubbles.len()).collect();
    order.sort_by(|&i, &j| priority_cmp(&bubbles[i], &bubbles[j]));
    order
}
