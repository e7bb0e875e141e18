//! Initial placement search
//!
//! Finds a non-overlapping position for a newly inserted bubble, preferring
//! positions near the viewport center. Three strategies in order: density
//! grid scan (crowded sets), golden-angle spiral search, then a randomized
//! clamped fallback that accepts overlap rather than fail.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;

use super::bubble::{Bubble, Viewport};
use super::clamp::clamp_to_viewport;
use crate::consts::{EDGE_PADDING, GOLDEN_ANGLE, GRID_SCAN_THRESHOLD, SPIRAL_BUDGET};
use crate::tuning::LayoutTuning;
use crate::{sane_size, top_left_of};

/// Compute a position for a new bubble of `size` among `existing` bubbles.
///
/// Returns the top-left corner of the bounding box. Never fails: when the
/// search budget runs out the fallback is a random clamped position whose
/// overlap the resolver is expected to work off afterwards.
pub fn compute_initial_position(
    size: f32,
    viewport: &Viewport,
    existing: &[Bubble],
    tuning: &LayoutTuning,
    rng: &mut impl Rng,
) -> Vec2 {
    let size = sane_size(size);
    if viewport.is_degenerate() {
        return Vec2::new(EDGE_PADDING, viewport.top_inset.max(0.0));
    }

    // First bubble sits at the exact center of the playable area
    if existing.is_empty() {
        return top_left_of(viewport.play_center(), size);
    }

    if existing.len() > GRID_SCAN_THRESHOLD {
        if let Some(pos) = grid_scan(size, viewport, existing, tuning) {
            return pos;
        }
    }

    if let Some(pos) = spiral_search(size, viewport, existing, tuning) {
        return pos;
    }

    log::warn!(
        "placement search exhausted for size {size:.0} among {} bubbles; \
         falling back to a random position",
        existing.len()
    );
    random_fallback(size, viewport, rng)
}

/// Overlay a grid of `size * spacing` cells on the playable area, mark cells
/// whose neighborhood holds an existing bubble center, and take the first
/// free cell in row-major order.
fn grid_scan(
    size: f32,
    viewport: &Viewport,
    existing: &[Bubble],
    tuning: &LayoutTuning,
) -> Option<Vec2> {
    let cell = size * tuning.spacing_place;
    if cell <= 0.0 {
        return None;
    }

    let origin = Vec2::new(EDGE_PADDING, viewport.top_inset);
    let usable_w = viewport.width - size - 2.0 * EDGE_PADDING;
    let usable_h = viewport.height - size - EDGE_PADDING - viewport.top_inset;
    if usable_w < 0.0 || usable_h < 0.0 {
        return None;
    }
    let cols = (usable_w / cell) as i32 + 1;
    let rows = (usable_h / cell) as i32 + 1;

    let mut occupied: HashSet<(i32, i32)> = HashSet::new();
    for bubble in existing {
        let rel = bubble.center() - origin;
        let cx = (rel.x / cell).floor() as i32;
        let cy = (rel.y / cell).floor() as i32;
        // The cell itself plus its neighborhood within unit euclidean
        // distance (the four orthogonal cells)
        for (dx, dy) in [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)] {
            occupied.insert((cx + dx, cy + dy));
        }
    }

    for row in 0..rows {
        for col in 0..cols {
            if !occupied.contains(&(col, row)) {
                return Some(origin + Vec2::new(col as f32 * cell, row as f32 * cell));
            }
        }
    }
    None
}

/// Golden-angle spiral outward from the viewport center
fn spiral_search(
    size: f32,
    viewport: &Viewport,
    existing: &[Bubble],
    tuning: &LayoutTuning,
) -> Option<Vec2> {
    let origin = viewport.play_center();

    for i in 0..SPIRAL_BUDGET {
        let angle = i as f32 * GOLDEN_ANGLE;
        let radius = size / 3.0 * 0.7 * ((i + 1) as f32).sqrt();
        let center = origin + radius * Vec2::new(angle.cos(), angle.sin());
        let pos = top_left_of(center, size);

        let in_bounds = pos.x >= EDGE_PADDING
            && pos.x + size <= viewport.width - EDGE_PADDING
            && pos.y >= viewport.top_inset
            && pos.y + size <= viewport.height - EDGE_PADDING;
        if !in_bounds {
            continue;
        }

        let clear = existing.iter().all(|other| {
            let min_dist = tuning.spacing_place * (size + other.size) / 2.0;
            center.distance(other.center()) >= min_dist
        });
        if clear {
            return Some(pos);
        }
    }
    None
}

/// Best-effort random position; collision is not guaranteed
fn random_fallback(size: f32, viewport: &Viewport, rng: &mut impl Rng) -> Vec2 {
    let x = rng.random_range(0.0..viewport.width);
    let y = rng.random_range(viewport.top_inset..viewport.height);
    clamp_to_viewport(Vec2::new(x, y), size, viewport)
}
