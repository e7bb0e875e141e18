//! Viewport clamping
//!
//! Keeps a single bubble's bounding box inside the visible play-field,
//! independent of every other bubble.

use glam::Vec2;

use super::bubble::Viewport;
use crate::consts::EDGE_PADDING;

/// Clamp a bounding-box position into
/// `[padding, width - size - padding] x [top_inset, height - size - padding]`.
///
/// Degenerate inputs are handled without panicking: when the bubble is wider
/// than the viewport the position lands on the padding origin, and a
/// degenerate viewport returns the position unchanged. NaN coordinates
/// resolve to an in-bounds value.
pub fn clamp_to_viewport(pos: Vec2, size: f32, viewport: &Viewport) -> Vec2 {
    if viewport.is_degenerate() {
        return pos;
    }

    // min-then-max, not f32::clamp: when size exceeds the viewport the upper
    // bound drops below the lower and the lower bound must win.
    let x = pos
        .x
        .min(viewport.width - size - EDGE_PADDING)
        .max(EDGE_PADDING);
    let y = pos
        .y
        .min(viewport.height - size - EDGE_PADDING)
        .max(viewport.top_inset);

    Vec2::new(x, y)
}
