//! Deterministic grid arrangement
//!
//! The canonical resting layout: bubbles flow into a column/row grid in
//! priority order. Column counts come from the tuning breakpoint tables, so
//! density calibration never touches this code. The desktop arranger is a
//! no-op at or below the mobile breakpoint and vice versa; both are no-ops
//! for degenerate viewports.

use std::collections::HashMap;

use glam::Vec2;

use super::bubble::{Bubble, Viewport};
use super::clamp::clamp_to_viewport;
use super::order::priority_order;
use crate::tuning::LayoutTuning;

/// Full deterministic re-layout for desktop viewports.
///
/// Returns target top-left positions keyed by bubble id. Positions for the
/// same bubble set and viewport are identical across calls - there is no
/// randomness here.
pub fn arrange_grid(
    bubbles: &[Bubble],
    viewport: &Viewport,
    tuning: &LayoutTuning,
) -> HashMap<String, Vec2> {
    if viewport.is_degenerate() || tuning.is_mobile(viewport) {
        return current_positions(bubbles);
    }
    let columns = tuning.columns_for(viewport) as usize;
    place_rows(
        bubbles,
        viewport,
        columns,
        tuning.grid_margin,
        tuning.row_margin,
        1.0,
    )
}

/// Tighter fixed-column variant for narrow viewports.
///
/// Packs with diameters scaled by `mobile_shrink`; the actual size change is
/// the resize adapter's job, so repeated arrangement cannot compound the
/// factor.
pub fn arrange_mobile_grid(
    bubbles: &[Bubble],
    viewport: &Viewport,
    tuning: &LayoutTuning,
) -> HashMap<String, Vec2> {
    if viewport.is_degenerate() || !tuning.is_mobile(viewport) {
        return current_positions(bubbles);
    }
    let columns = tuning.mobile_columns_for(viewport) as usize;
    place_rows(
        bubbles,
        viewport,
        columns,
        tuning.grid_margin / 2.0,
        tuning.mobile_row_gap,
        tuning.mobile_shrink,
    )
}

/// True when any bubble sits further than `epsilon` from its target
/// position. Callers use this to skip re-applying a layout that would not
/// visibly move anything.
pub fn positions_changed(
    bubbles: &[Bubble],
    target: &HashMap<String, Vec2>,
    epsilon: f32,
) -> bool {
    bubbles.iter().any(|bubble| {
        target
            .get(&bubble.id)
            .is_some_and(|pos| pos.distance(bubble.pos) > epsilon)
    })
}

fn place_rows(
    bubbles: &[Bubble],
    viewport: &Viewport,
    columns: usize,
    margin: f32,
    row_gap: f32,
    size_factor: f32,
) -> HashMap<String, Vec2> {
    let columns = columns.max(1);
    let cell_w = (viewport.width - 2.0 * margin) / columns as f32;
    let order = priority_order(bubbles);

    let mut positions = HashMap::with_capacity(bubbles.len());
    let mut row_y = viewport.top_inset + row_gap;

    for row_indices in order.chunks(columns) {
        let row_h = row_indices
            .iter()
            .map(|&idx| bubbles[idx].size * size_factor)
            .fold(0.0f32, f32::max);

        for (col, &idx) in row_indices.iter().enumerate() {
            let bubble = &bubbles[idx];
            let size = bubble.size * size_factor;
            let x = margin + col as f32 * cell_w + (cell_w - size) / 2.0;
            let y = row_y + (row_h - size) / 2.0;
            let pos = clamp_to_viewport(Vec2::new(x, y), size, viewport);
            positions.insert(bubble.id.clone(), pos);
        }

        row_y += row_h + row_gap;
    }
    positions
}

fn current_positions(bubbles: &[Bubble]) -> HashMap<String, Vec2> {
    bubbles
        .iter()
        .map(|bubble| (bubble.id.clone(), bubble.pos))
        .collect()
}
