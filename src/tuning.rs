//! Data-driven layout calibration
//!
//! Every empirically tuned value lives here: spacing factors, push shares,
//! iteration budgets, and the breakpoint tables mapping viewport geometry to
//! column counts, page sizes, and maximum bubble size. The tables are data,
//! not branches, so density can be recalibrated without touching the
//! algorithms.

use serde::{Deserialize, Serialize};

use crate::layout::Viewport;

/// Column count pinned to one hand-calibrated resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExactResolution {
    pub width: f32,
    pub height: f32,
    pub columns: u32,
}

/// Width-band rule: applies to any viewport at least `min_width` wide
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidthBand {
    pub min_width: f32,
    pub columns: u32,
}

/// Area-band rule for page sizing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaBand {
    pub min_area: f32,
    pub items: usize,
}

/// Width-band rule for the viewport-derived maximum bubble diameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeBand {
    pub min_width: f32,
    pub size: f32,
}

/// Layout calibration
///
/// Defaults are the tuned production values; hosts may deserialize an
/// override from JSON (missing fields keep their defaults).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutTuning {
    /// Spacing factor used by the initial placer (tighter)
    pub spacing_place: f32,
    /// Spacing factor enforced by the overlap resolver (looser)
    pub spacing_resolve: f32,
    /// Fraction of the raw overlap applied as push per iteration
    pub push_damping: f32,
    /// Share of a mixed-tier push absorbed by the boosted bubble
    pub boosted_push_share: f32,
    /// Share of a same-tier push absorbed by the newer (larger-id) bubble
    pub newer_push_share: f32,
    /// Iteration budget for an on-demand resolve pass
    pub resolve_iterations: u32,
    /// Velocity decay per continuous-correction step
    pub settle_damping: f32,
    /// Pixel threshold below which a recomputed grid layout is not re-applied
    pub reflow_epsilon: f32,
    /// Horizontal margin on each side of the grid
    pub grid_margin: f32,
    /// Vertical gap between grid rows
    pub row_margin: f32,
    /// Viewport width at and below which the mobile arranger takes over
    pub mobile_breakpoint: f32,
    /// Diameter factor applied to bubbles on mobile viewports
    pub mobile_shrink: f32,
    /// Vertical gap between mobile grid rows
    pub mobile_row_gap: f32,
    /// Continuous corrector runs once per this many `settle_tick` calls
    pub settle_interval_ticks: u64,
    /// Hand-calibrated resolutions checked before the width bands
    pub exact_columns: Vec<ExactResolution>,
    /// Desktop column bands, widest first
    pub column_bands: Vec<WidthBand>,
    /// Mobile column bands, widest first
    pub mobile_bands: Vec<WidthBand>,
    /// Items-per-page bands keyed by viewport area, largest first
    pub page_bands: Vec<AreaBand>,
    /// Maximum bubble diameter bands, widest first
    pub max_size_bands: Vec<SizeBand>,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            spacing_place: 0.9,
            spacing_resolve: 1.0,
            push_damping: 0.8,
            boosted_push_share: 0.2,
            newer_push_share: 0.65,
            resolve_iterations: crate::consts::RESOLVE_ITERATIONS,
            settle_damping: 0.6,
            reflow_epsilon: 2.0,
            grid_margin: 24.0,
            row_margin: 16.0,
            mobile_breakpoint: 768.0,
            mobile_shrink: 0.85,
            mobile_row_gap: 8.0,
            settle_interval_ticks: 60,
            exact_columns: vec![
                ExactResolution { width: 1920.0, height: 1080.0, columns: 10 },
                ExactResolution { width: 1536.0, height: 864.0, columns: 9 },
                ExactResolution { width: 1440.0, height: 900.0, columns: 9 },
                ExactResolution { width: 1366.0, height: 768.0, columns: 8 },
            ],
            column_bands: vec![
                WidthBand { min_width: 1800.0, columns: 10 },
                WidthBand { min_width: 1500.0, columns: 9 },
                WidthBand { min_width: 1200.0, columns: 8 },
                WidthBand { min_width: 992.0, columns: 7 },
                WidthBand { min_width: 0.0, columns: 6 },
            ],
            mobile_bands: vec![
                WidthBand { min_width: 600.0, columns: 4 },
                WidthBand { min_width: 0.0, columns: 3 },
            ],
            page_bands: vec![
                AreaBand { min_area: 1_500_000.0, items: 50 },
                AreaBand { min_area: 900_000.0, items: 35 },
                AreaBand { min_area: 0.0, items: 20 },
            ],
            max_size_bands: vec![
                SizeBand { min_width: 1500.0, size: 120.0 },
                SizeBand { min_width: 1200.0, size: 110.0 },
                SizeBand { min_width: 992.0, size: 100.0 },
                SizeBand { min_width: 768.0, size: 90.0 },
                SizeBand { min_width: 0.0, size: 72.0 },
            ],
        }
    }
}

impl LayoutTuning {
    /// Parse a tuning override from JSON; missing fields keep defaults
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        log::debug!(
            "loaded layout tuning ({} exact resolutions, {} column bands)",
            tuning.exact_columns.len(),
            tuning.column_bands.len()
        );
        Ok(tuning)
    }

    /// Whether the viewport falls under the mobile arranger
    pub fn is_mobile(&self, viewport: &Viewport) -> bool {
        viewport.width <= self.mobile_breakpoint
    }

    /// Desktop column count: exact calibrated resolutions first, then bands
    pub fn columns_for(&self, viewport: &Viewport) -> u32 {
        for exact in &self.exact_columns {
            if (viewport.width - exact.width).abs() < 0.5
                && (viewport.height - exact.height).abs() < 0.5
            {
                return exact.columns;
            }
        }
        self.column_bands
            .iter()
            .find(|band| viewport.width >= band.min_width)
            .map(|band| band.columns)
            .unwrap_or(6)
            .max(1)
    }

    /// Mobile column count for narrow viewports
    pub fn mobile_columns_for(&self, viewport: &Viewport) -> u32 {
        self.mobile_bands
            .iter()
            .find(|band| viewport.width >= band.min_width)
            .map(|band| band.columns)
            .unwrap_or(3)
            .max(1)
    }

    /// Page size derived from viewport area
    pub fn items_per_page(&self, viewport: &Viewport) -> usize {
        let area = viewport.width * viewport.height;
        self.page_bands
            .iter()
            .find(|band| area >= band.min_area)
            .map(|band| band.items)
            .unwrap_or(20)
            .max(1)
    }

    /// Viewport-derived maximum bubble diameter
    pub fn max_bubble_size(&self, viewport: &Viewport) -> f32 {
        let base = self
            .max_size_bands
            .iter()
            .find(|band| viewport.width >= band.min_width)
            .map(|band| band.size)
            .unwrap_or(72.0);
        base.max(crate::consts::MIN_BUBBLE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_resolution_wins_over_band() {
        let tuning = LayoutTuning::default();
        // 1366x768 is calibrated to 8; the width band alone would say 8 too,
        // so check 1440x900 where the band (>=1200 -> 8) disagrees with the
        // calibrated 9.
        let vp = Viewport::new(1440.0, 900.0, 0.0);
        assert_eq!(tuning.columns_for(&vp), 9);
    }

    #[test]
    fn test_band_fallback_for_uncalibrated_width() {
        let tuning = LayoutTuning::default();
        let vp = Viewport::new(1700.0, 950.0, 0.0);
        assert_eq!(tuning.columns_for(&vp), 9);
        let narrow = Viewport::new(1000.0, 700.0, 0.0);
        assert_eq!(tuning.columns_for(&narrow), 7);
    }

    #[test]
    fn test_mobile_breakpoint_and_columns() {
        let tuning = LayoutTuning::default();
        assert!(tuning.is_mobile(&Viewport::new(414.0, 896.0, 0.0)));
        assert!(!tuning.is_mobile(&Viewport::new(1024.0, 768.0, 0.0)));
        assert_eq!(tuning.mobile_columns_for(&Viewport::new(414.0, 896.0, 0.0)), 3);
        assert_eq!(tuning.mobile_columns_for(&Viewport::new(640.0, 960.0, 0.0)), 4);
    }

    #[test]
    fn test_items_per_page_by_area() {
        let tuning = LayoutTuning::default();
        assert_eq!(tuning.items_per_page(&Viewport::new(1920.0, 1080.0, 0.0)), 50);
        assert_eq!(tuning.items_per_page(&Viewport::new(1280.0, 800.0, 0.0)), 35);
        assert_eq!(tuning.items_per_page(&Viewport::new(414.0, 896.0, 0.0)), 20);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = LayoutTuning::from_json_str(r#"{ "mobile_breakpoint": 640.0 }"#).unwrap();
        assert_eq!(tuning.mobile_breakpoint, 640.0);
        assert_eq!(tuning.resolve_iterations, LayoutTuning::default().resolve_iterations);
        assert_eq!(tuning.column_bands, LayoutTuning::default().column_bands);
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = LayoutTuning::default();
        let json = serde_json::to_string(&tuning).unwrap();
        let back = LayoutTuning::from_json_str(&json).unwrap();
        assert_eq!(back.spacing_place, tuning.spacing_place);
        assert_eq!(back.exact_columns, tuning.exact_columns);
        assert_eq!(back.page_bands, tuning.page_bands);
    }
}
