//! Bubblewall - layout engine for a wall of circular listings
//!
//! Core modules:
//! - `layout`: Deterministic layout passes (placement, overlap resolution,
//!   grid arrangement, pagination) and the stateful `BubbleField`
//! - `tuning`: Data-driven layout calibration (breakpoint tables, spacing,
//!   push ratios)
//!
//! The engine is pure computation: it consumes bubbles and viewport
//! geometry and produces positions. Rendering, transport, and the business
//! rules behind priority/score belong to the host.

pub mod layout;
pub mod tuning;

pub use layout::{
    Bubble, BubbleField, Page, ResolveOutcome, Tier, Viewport, adapt_sizes_for_resize,
    arrange_grid, arrange_mobile_grid, clamp_to_viewport, compute_initial_position, paginate,
    positions_changed, priority_order, resolve_overlaps, settle,
};
pub use tuning::LayoutTuning;

use glam::Vec2;

/// Layout configuration constants
pub mod consts {
    /// Smallest diameter a bubble may shrink to
    pub const MIN_BUBBLE_SIZE: f32 = 20.0;
    /// Gap kept between any bubble's bounding box and the viewport edge
    pub const EDGE_PADDING: f32 = 10.0;
    /// Existing-bubble count above which the initial placer tries a grid scan
    pub const GRID_SCAN_THRESHOLD: usize = 12;
    /// Candidate budget for the golden-angle spiral search
    pub const SPIRAL_BUDGET: usize = 1000;
    /// Golden angle in radians: pi * (3 - sqrt(5))
    pub const GOLDEN_ANGLE: f32 = 2.399_963_2;
    /// Recommended iteration budget for an on-demand resolve pass
    pub const RESOLVE_ITERATIONS: u32 = 25;
}

/// Center of a bubble's bounding box given its top-left corner and diameter
#[inline]
pub fn center_of(pos: Vec2, size: f32) -> Vec2 {
    pos + Vec2::splat(size / 2.0)
}

/// Top-left corner of a bubble's bounding box given its center and diameter
#[inline]
pub fn top_left_of(center: Vec2, size: f32) -> Vec2 {
    center - Vec2::splat(size / 2.0)
}

/// Distance between the centers of two bubbles
#[inline]
pub fn center_distance(pos_a: Vec2, size_a: f32, pos_b: Vec2, size_b: f32) -> f32 {
    center_of(pos_a, size_a).distance(center_of(pos_b, size_b))
}

/// Sanitize a caller-supplied diameter: NaN and sub-minimum values clamp up
#[inline]
pub fn sane_size(size: f32) -> f32 {
    if size.is_nan() {
        consts::MIN_BUBBLE_SIZE
    } else {
        size.max(consts::MIN_BUBBLE_SIZE)
    }
}
