//! Proportional size adaptation
//!
//! When the viewport-derived maximum bubble size changes, each bubble keeps
//! its *relative* shrink state: a bubble that had decayed to 40% of the old
//! maximum sits at 40% of the new one, floored at the minimum size. Boosted
//! bubbles are always pinned to the maximum.

use super::bubble::{Bubble, Tier};
use crate::consts::MIN_BUBBLE_SIZE;
use crate::sane_size;

/// Rescale every bubble for a change of the maximum diameter from
/// `old_max` to `new_max`, updating the per-bubble bookkeeping.
///
/// `old_max` is only consulted for bubbles whose `original_max_size` was
/// never recorded (callers migrating externally created bubbles).
pub fn adapt_sizes_for_resize(bubbles: &mut [Bubble], old_max: f32, new_max: f32) {
    let new_max = sane_size(new_max);

    for bubble in bubbles.iter_mut() {
        match bubble.tier {
            Tier::Boosted => {
                bubble.size = new_max;
            }
            Tier::Normal => {
                let basis = if bubble.original_max_size > 0.0 {
                    bubble.original_max_size
                } else {
                    old_max
                };
                let shrink_ratio = if basis > 0.0 {
                    bubble.size / basis
                } else {
                    1.0
                };
                bubble.size = (new_max * shrink_ratio).max(MIN_BUBBLE_SIZE);
            }
        }
        bubble.original_max_size = new_max;
    }
}
