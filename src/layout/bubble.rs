//! Bubble and viewport types
//!
//! A bubble is a circular visual element with a square bounding box. The
//! engine owns `pos`/`size` while a layout pass runs; the caller owns them
//! between passes and owns `tier`/`score` outright.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{center_of, sane_size, top_left_of};

/// Priority tier - boosted bubbles are laid out first and pushed least
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    /// Paid/promoted listing: always first, always at maximum size
    Boosted,
    /// Regular listing: sized between the minimum and the viewport maximum
    Normal,
}

/// A bubble entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    /// Caller-supplied stable identifier, unique within the active set.
    /// Lexicographic order doubles as a newer-than proxy for push splits.
    pub id: String,
    /// Top-left corner of the bounding box, viewport pixels
    pub pos: Vec2,
    /// Current diameter
    pub size: f32,
    pub tier: Tier,
    /// Ranking within the tier (vote count); caller-mutable between passes
    pub score: i64,
    /// Diameter when the bubble first entered the engine
    pub original_size: f32,
    /// Viewport maximum diameter the current size was scaled against
    pub original_max_size: f32,
    /// Transient correction velocity; meaningful only inside a settle pass
    #[serde(skip)]
    pub vel: Vec2,
}

impl Bubble {
    pub fn new(id: impl Into<String>, size: f32, tier: Tier, score: i64) -> Self {
        let size = sane_size(size);
        Self {
            id: id.into(),
            pos: Vec2::ZERO,
            size,
            tier,
            score,
            original_size: size,
            original_max_size: size,
            vel: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Center of the bounding box
    #[inline]
    pub fn center(&self) -> Vec2 {
        center_of(self.pos, self.size)
    }

    /// Move the bubble so its center lands on `center`
    #[inline]
    pub fn set_center(&mut self, center: Vec2) {
        self.pos = top_left_of(center, self.size);
    }

    #[inline]
    pub fn is_boosted(&self) -> bool {
        self.tier == Tier::Boosted
    }
}

/// The visible layout area
///
/// `top_inset` reserves a band at the top (fixed headers) that bubbles must
/// not occupy. Supplied fresh on every layout call - never cached across
/// resizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub top_inset: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, top_inset: f32) -> Self {
        Self {
            width,
            height,
            top_inset,
        }
    }

    /// True when no layout is possible: every pass becomes a no-op
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0) || self.play_height() <= 0.0
    }

    /// Height of the playable band below the top inset
    #[inline]
    pub fn play_height(&self) -> f32 {
        self.height - self.top_inset
    }

    /// Center of the playable area
    #[inline]
    pub fn play_center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.top_inset + self.play_height() / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_round_trip() {
        let mut bubble = Bubble::new("a", 60.0, Tier::Normal, 0);
        bubble.set_center(Vec2::new(200.0, 150.0));
        assert_eq!(bubble.center(), Vec2::new(200.0, 150.0));
        assert_eq!(bubble.pos, Vec2::new(170.0, 120.0));
    }

    #[test]
    fn test_nan_size_is_sanitized() {
        let bubble = Bubble::new("a", f32::NAN, Tier::Normal, 0);
        assert_eq!(bubble.size, crate::consts::MIN_BUBBLE_SIZE);
    }

    #[test]
    fn test_degenerate_viewports() {
        assert!(Viewport::new(0.0, 600.0, 0.0).is_degenerate());
        assert!(Viewport::new(800.0, 0.0, 0.0).is_degenerate());
        assert!(Viewport::new(800.0, 100.0, 100.0).is_degenerate());
        assert!(Viewport::new(f32::NAN, 600.0, 0.0).is_degenerate());
        assert!(!Viewport::new(800.0, 600.0, 64.0).is_degenerate());
    }

    #[test]
    fn test_play_center_respects_inset() {
        let vp = Viewport::new(800.0, 600.0, 100.0);
        assert_eq!(vp.play_center(), Vec2::new(400.0, 350.0));
    }
}
