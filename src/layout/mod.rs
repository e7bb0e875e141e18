//! Deterministic layout passes
//!
//! All layout logic lives here. This module must be pure and deterministic:
//! - Bounded iteration only
//! - Seeded RNG only (the randomized placement fallback)
//! - Stable ordering (priority tier, then score, then insertion order)
//! - No rendering or platform dependencies

pub mod bubble;
pub mod clamp;
pub mod field;
pub mod grid;
pub mod order;
pub mod paginate;
pub mod place;
pub mod resize;
pub mod resolve;

pub use bubble::{Bubble, Tier, Viewport};
pub use clamp::clamp_to_viewport;
pub use field::BubbleField;
pub use grid::{arrange_grid, arrange_mobile_grid, positions_changed};
pub use order::{priority_cmp, priority_order};
pub use paginate::{Page, paginate};
pub use place::compute_initial_position;
pub use resize::adapt_sizes_for_resize;
pub use resolve::{ResolveOutcome, resolve_overlaps, settle};
