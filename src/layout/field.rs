//! Stateful layout engine
//!
//! `BubbleField` owns the live bubble set and drives the layout passes in
//! the order the pipeline expects: ordering, placement or full reflow,
//! overlap resolution, viewport clamping. It also holds the last computed
//! grid snapshot (the reflow guard) and the seeded RNG behind the placement
//! fallback, so every run with the same seed and event sequence is
//! identical.
//!
//! The field is single-threaded and synchronous. Callers debounce reflow
//! triggers themselves; only single-bubble insertion is meant to run
//! unthrottled.

use std::collections::HashMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::bubble::{Bubble, Tier, Viewport};
use super::clamp::clamp_to_viewport;
use super::grid::{arrange_grid, arrange_mobile_grid, positions_changed};
use super::order::priority_cmp;
use super::paginate::{Page, paginate};
use super::place::compute_initial_position;
use super::resize::adapt_sizes_for_resize;
use super::resolve::{resolve_overlaps, settle};
use crate::sane_size;
use crate::tuning::LayoutTuning;

/// The engine: live bubbles, viewport, calibration, and layout state
#[derive(Debug, Clone)]
pub struct BubbleField {
    bubbles: Vec<Bubble>,
    viewport: Viewport,
    tuning: LayoutTuning,
    rng: Pcg32,
    /// Viewport-derived maximum diameter currently in force
    max_size: f32,
    /// Counts `settle_tick` calls for rate limiting
    ticks: u64,
    /// Last grid layout actually applied, keyed by bubble id
    last_layout: HashMap<String, Vec2>,
}

impl BubbleField {
    pub fn new(seed: u64, viewport: Viewport, tuning: LayoutTuning) -> Self {
        let max_size = effective_max_size(&viewport, &tuning);
        Self {
            bubbles: Vec::new(),
            viewport,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            max_size,
            ticks: 0,
            last_layout: HashMap::new(),
        }
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Maximum diameter bubbles may currently take
    pub fn max_size(&self) -> f32 {
        self.max_size
    }

    /// Last applied grid layout, for render layers that diff positions
    pub fn last_layout(&self) -> &HashMap<String, Vec2> {
        &self.last_layout
    }

    pub fn contains(&self, id: &str) -> bool {
        self.bubbles.iter().any(|bubble| bubble.id == id)
    }

    /// Add a bubble and give it its one-time initial placement.
    ///
    /// Boosted bubbles enter at the current maximum size; normal bubbles
    /// take the (sanitized) hint capped at the maximum. Returns false when
    /// the id is already active.
    pub fn insert(&mut self, id: impl Into<String>, tier: Tier, score: i64, size_hint: f32) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }

        let size = match tier {
            Tier::Boosted => self.max_size,
            Tier::Normal => sane_size(size_hint).min(self.max_size),
        };
        let pos = compute_initial_position(size, &self.viewport, &self.bubbles, &self.tuning, &mut self.rng);

        let mut bubble = Bubble::new(id, size, tier, score);
        bubble.pos = pos;
        bubble.original_max_size = self.max_size;
        self.bubbles.push(bubble);

        resolve_overlaps(
            &mut self.bubbles,
            &self.viewport,
            self.tuning.resolve_iterations,
            &self.tuning,
        );
        self.clamp_all();
        true
    }

    /// Remove a bubble; the engine itself never initiates this
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.bubbles.len();
        self.bubbles.retain(|bubble| bubble.id != id);
        self.last_layout.remove(id);
        self.bubbles.len() != before
    }

    /// Update tier/score; takes effect on the next ordering pass.
    ///
    /// A promotion to boosted pins the size to the current maximum.
    pub fn update_rank(&mut self, id: &str, tier: Tier, score: i64) -> bool {
        let max_size = self.max_size;
        let Some(bubble) = self.bubbles.iter_mut().find(|bubble| bubble.id == id) else {
            return false;
        };
        if tier == Tier::Boosted && bubble.tier != Tier::Boosted {
            bubble.size = max_size;
        }
        bubble.tier = tier;
        bubble.score = score;
        true
    }

    /// Replace the viewport: rescale sizes, reflow, resolve, clamp
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.viewport.is_degenerate() {
            return;
        }

        let new_max = effective_max_size(&self.viewport, &self.tuning);
        if (new_max - self.max_size).abs() > f32::EPSILON {
            adapt_sizes_for_resize(&mut self.bubbles, self.max_size, new_max);
            self.max_size = new_max;
        }
        self.reflow();
    }

    /// Full re-layout into the canonical grid (desktop or mobile by
    /// breakpoint), guarded so unchanged layouts are not re-applied.
    pub fn reflow(&mut self) {
        if self.viewport.is_degenerate() || self.bubbles.is_empty() {
            return;
        }

        let target = if self.tuning.is_mobile(&self.viewport) {
            arrange_mobile_grid(&self.bubbles, &self.viewport, &self.tuning)
        } else {
            arrange_grid(&self.bubbles, &self.viewport, &self.tuning)
        };

        if !positions_changed(&self.bubbles, &target, self.tuning.reflow_epsilon) {
            log::trace!("reflow skipped: no bubble would move past the pixel threshold");
            return;
        }

        log::debug!("reflow: applying grid layout to {} bubbles", self.bubbles.len());
        for bubble in &mut self.bubbles {
            // Ids missing from the target (removed mid-computation) keep
            // their positions; never an error
            if let Some(&pos) = target.get(&bubble.id) {
                bubble.pos = pos;
                bubble.vel = Vec2::ZERO;
            }
        }
        self.last_layout = target;

        resolve_overlaps(
            &mut self.bubbles,
            &self.viewport,
            self.tuning.resolve_iterations,
            &self.tuning,
        );
        self.clamp_all();
    }

    /// Steady-state corrector: runs one damped separation step once per
    /// `settle_interval_ticks` calls, and does nothing on an empty set.
    /// Returns the violations seen by the step, or 0 on off-ticks.
    pub fn settle_tick(&mut self) -> usize {
        self.ticks += 1;
        if self.bubbles.is_empty() {
            return 0;
        }
        if !self.ticks.is_multiple_of(self.tuning.settle_interval_ticks.max(1)) {
            return 0;
        }
        settle(&mut self.bubbles, &self.viewport, &self.tuning)
    }

    /// Visible subset for a 1-indexed page, with the page size derived from
    /// the current viewport
    pub fn page(&self, number: usize) -> Page {
        let mut ordered = self.bubbles.clone();
        ordered.sort_by(priority_cmp);
        paginate(&ordered, self.tuning.items_per_page(&self.viewport), number)
    }

    fn clamp_all(&mut self) {
        for bubble in &mut self.bubbles {
            bubble.pos = clamp_to_viewport(bubble.pos, bubble.size, &self.viewport);
        }
    }
}

/// Viewport-derived maximum diameter; mobile viewports scale it down
fn effective_max_size(viewport: &Viewport, tuning: &LayoutTuning) -> f32 {
    let base = tuning.max_bubble_size(viewport);
    if tuning.is_mobile(viewport) {
        sane_size(base * tuning.mobile_shrink)
    } else {
        base
    }
}
