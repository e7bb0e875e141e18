//! Overlap resolution
//!
//! Iterative separation pass that nudges overlapping bubbles apart along the
//! line connecting their centers. The push is split unevenly: boosted
//! bubbles absorb a small share against normal ones, and within a tier the
//! newer bubble (larger id) absorbs more, so established bubbles stay put.
//!
//! Two variants share the pair math: `resolve_overlaps` runs a bounded
//! iteration loop on demand, `settle` performs one velocity-damped step per
//! call for use as a steady-state corrector on a caller-driven timer.

use glam::Vec2;

use super::bubble::{Bubble, Tier, Viewport};
use super::clamp::clamp_to_viewport;
use crate::consts::GOLDEN_ANGLE;
use crate::tuning::LayoutTuning;

/// Result of an on-demand resolve pass
#[derive(Debug, Clone, Copy)]
pub struct ResolveOutcome {
    /// Iterations actually run
    pub iterations: u32,
    /// Whether a violation-free state was reached within the budget
    pub converged: bool,
}

/// Separate overlapping bubbles in place, up to `max_iterations` passes.
///
/// Stops early once a full pass finds no violation. An exhausted budget is
/// logged and reported, never raised: the layout is best-effort by design.
pub fn resolve_overlaps(
    bubbles: &mut [Bubble],
    viewport: &Viewport,
    max_iterations: u32,
    tuning: &LayoutTuning,
) -> ResolveOutcome {
    if viewport.is_degenerate() || bubbles.len() < 2 {
        return ResolveOutcome {
            iterations: 0,
            converged: true,
        };
    }

    for iteration in 0..max_iterations {
        if separation_pass(bubbles, viewport, tuning) == 0 {
            return ResolveOutcome {
                iterations: iteration,
                converged: true,
            };
        }
    }

    let converged = count_violations(bubbles, tuning.spacing_resolve) == 0;
    if !converged {
        log::warn!(
            "overlap resolution budget exhausted after {max_iterations} iterations \
             ({} bubbles); keeping best-effort layout",
            bubbles.len()
        );
    }
    ResolveOutcome {
        iterations: max_iterations,
        converged,
    }
}

/// One steady-state correction step: pushes accumulate into velocities,
/// positions integrate, velocities decay. Returns the violation count seen,
/// so callers can observe convergence.
pub fn settle(bubbles: &mut [Bubble], viewport: &Viewport, tuning: &LayoutTuning) -> usize {
    if viewport.is_degenerate() || bubbles.is_empty() {
        return 0;
    }

    let mut violations = 0;
    for i in 0..bubbles.len() {
        for j in (i + 1)..bubbles.len() {
            let Some((dir, push)) = pair_push(&bubbles[i], &bubbles[j], i, j, tuning) else {
                continue;
            };
            violations += 1;
            let (share_a, share_b) = push_shares(&bubbles[i], &bubbles[j], tuning);
            bubbles[i].vel -= dir * (push * share_a);
            bubbles[j].vel += dir * (push * share_b);
        }
    }

    for bubble in bubbles.iter_mut() {
        if bubble.vel.length_squared() < 1e-4 {
            bubble.vel = Vec2::ZERO;
            continue;
        }
        bubble.pos += bubble.vel;
        bubble.vel *= tuning.settle_damping;
        bubble.pos = clamp_to_viewport(bubble.pos, bubble.size, viewport);
    }

    violations
}

/// Count pairs violating the minimum-distance invariant at `spacing`
pub fn count_violations(bubbles: &[Bubble], spacing: f32) -> usize {
    let mut violations = 0;
    for i in 0..bubbles.len() {
        for j in (i + 1)..bubbles.len() {
            let min_dist = (bubbles[i].size + bubbles[j].size) / 2.0 * spacing;
            if bubbles[i].center().distance(bubbles[j].center()) < min_dist {
                violations += 1;
            }
        }
    }
    violations
}

/// One full pass over every unordered pair; returns the violation count
fn separation_pass(bubbles: &mut [Bubble], viewport: &Viewport, tuning: &LayoutTuning) -> usize {
    let mut violations = 0;
    for i in 0..bubbles.len() {
        for j in (i + 1)..bubbles.len() {
            let Some((dir, push)) = pair_push(&bubbles[i], &bubbles[j], i, j, tuning) else {
                continue;
            };
            violations += 1;
            let (share_a, share_b) = push_shares(&bubbles[i], &bubbles[j], tuning);
            bubbles[i].pos -= dir * (push * share_a);
            bubbles[j].pos += dir * (push * share_b);
            bubbles[i].pos = clamp_to_viewport(bubbles[i].pos, bubbles[i].size, viewport);
            bubbles[j].pos = clamp_to_viewport(bubbles[j].pos, bubbles[j].size, viewport);
        }
    }
    violations
}

/// Push direction (a -> b) and damped magnitude for a violating pair,
/// or None when the pair already keeps its distance
fn pair_push(
    a: &Bubble,
    b: &Bubble,
    i: usize,
    j: usize,
    tuning: &LayoutTuning,
) -> Option<(Vec2, f32)> {
    let min_dist = (a.size + b.size) / 2.0 * tuning.spacing_resolve;
    let delta = b.center() - a.center();
    let dist = delta.length();
    if dist >= min_dist {
        return None;
    }

    let dir = if dist > f32::EPSILON {
        delta / dist
    } else {
        // Coincident centers: derive a deterministic direction from the
        // pair index so repeated passes cannot oscillate
        let angle = (i * 31 + j) as f32 * GOLDEN_ANGLE;
        Vec2::new(angle.cos(), angle.sin())
    };
    Some((dir, (min_dist - dist) * tuning.push_damping))
}

/// Split of the push between the two bubbles; shares sum to 1.
///
/// Boosted absorbs a small share against normal; within a tier the
/// lexicographically larger id (newer) absorbs the larger share.
fn push_shares(a: &Bubble, b: &Bubble, tuning: &LayoutTuning) -> (f32, f32) {
    match (a.tier, b.tier) {
        (Tier::Boosted, Tier::Normal) => (tuning.boosted_push_share, 1.0 - tuning.boosted_push_share),
        (Tier::Normal, Tier::Boosted) => (1.0 - tuning.boosted_push_share, tuning.boosted_push_share),
        _ => {
            if a.id > b.id {
                (tuning.newer_push_share, 1.0 - tuning.newer_push_share)
            } else {
                (1.0 - tuning.newer_push_share, tuning.newer_push_share)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::place::compute_initial_position;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    fn tuning() -> LayoutTuning {
        LayoutTuning::default()
    }

    fn bubble_at(id: &str, tier: Tier, size: f32, pos: Vec2) -> Bubble {
        let mut bubble = Bubble::new(id, size, tier, 0);
        bubble.pos = pos;
        bubble
    }

    #[test]
    fn test_two_overlapping_bubbles_separate() {
        let vp = Viewport::new(1200.0, 900.0, 0.0);
        let tuning = tuning();
        let mut bubbles = vec![
            bubble_at("a", Tier::Normal, 100.0, Vec2::new(400.0, 400.0)),
            bubble_at("b", Tier::Normal, 100.0, Vec2::new(430.0, 400.0)),
        ];
        let outcome = resolve_overlaps(&mut bubbles, &vp, 25, &tuning);
        assert!(outcome.converged);
        let dist = bubbles[0].center().distance(bubbles[1].center());
        assert!(dist >= 100.0 * tuning.spacing_resolve - 0.001, "dist {dist}");
    }

    #[test]
    fn test_boosted_bubble_moves_less() {
        let vp = Viewport::new(1600.0, 1000.0, 0.0);
        let boosted_start = Vec2::new(700.0, 450.0);
        let normal_start = Vec2::new(740.0, 450.0);
        let mut bubbles = vec![
            bubble_at("a", Tier::Boosted, 100.0, boosted_start),
            bubble_at("b", Tier::Normal, 100.0, normal_start),
        ];
        resolve_overlaps(&mut bubbles, &vp, 25, &tuning());
        let boosted_moved = bubbles[0].pos.distance(boosted_start);
        let normal_moved = bubbles[1].pos.distance(normal_start);
        assert!(
            boosted_moved < normal_moved,
            "boosted moved {boosted_moved}, normal moved {normal_moved}"
        );
    }

    #[test]
    fn test_older_id_moves_less_within_tier() {
        let vp = Viewport::new(1600.0, 1000.0, 0.0);
        let older_start = Vec2::new(700.0, 450.0);
        let newer_start = Vec2::new(740.0, 450.0);
        let mut bubbles = vec![
            bubble_at("0001", Tier::Normal, 100.0, older_start),
            bubble_at("0009", Tier::Normal, 100.0, newer_start),
        ];
        resolve_overlaps(&mut bubbles, &vp, 25, &tuning());
        let older_moved = bubbles[0].pos.distance(older_start);
        let newer_moved = bubbles[1].pos.distance(newer_start);
        assert!(older_moved < newer_moved);
    }

    #[test]
    fn test_coincident_centers_still_separate() {
        let vp = Viewport::new(1200.0, 900.0, 0.0);
        let mut bubbles = vec![
            bubble_at("a", Tier::Normal, 80.0, Vec2::new(500.0, 400.0)),
            bubble_at("b", Tier::Normal, 80.0, Vec2::new(500.0, 400.0)),
        ];
        let outcome = resolve_overlaps(&mut bubbles, &vp, 25, &tuning());
        assert!(outcome.converged);
        assert!(bubbles[0].center().distance(bubbles[1].center()) >= 80.0 - 0.001);
    }

    #[test]
    fn test_placed_set_converges_under_standard_budget() {
        let vp = Viewport::new(1600.0, 1000.0, 0.0);
        let tuning = tuning();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut bubbles: Vec<Bubble> = Vec::new();
        for i in 0..40 {
            let size = rng.random_range(20.0f32..48.0);
            let pos = compute_initial_position(size, &vp, &bubbles, &tuning, &mut rng);
            let mut bubble = Bubble::new(format!("b{i:02}"), size, Tier::Normal, 0);
            bubble.pos = pos;
            bubbles.push(bubble);
        }
        let outcome = resolve_overlaps(&mut bubbles, &vp, crate::consts::RESOLVE_ITERATIONS, &tuning);
        assert!(outcome.converged, "did not converge in {} iterations", outcome.iterations);
        assert_eq!(count_violations(&bubbles, tuning.spacing_resolve), 0);
    }

    #[test]
    fn test_overdense_set_exhausts_budget_gracefully() {
        // Far more bubble area than viewport area: convergence is impossible,
        // but every position must remain finite and in bounds
        let vp = Viewport::new(300.0, 300.0, 0.0);
        let mut bubbles: Vec<Bubble> = (0..20)
            .map(|i| {
                bubble_at(
                    &format!("b{i:02}"),
                    Tier::Normal,
                    120.0,
                    Vec2::new(100.0 + (i % 5) as f32 * 10.0, 100.0 + (i / 5) as f32 * 10.0),
                )
            })
            .collect();
        let outcome = resolve_overlaps(&mut bubbles, &vp, 25, &tuning());
        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 25);
        for bubble in &bubbles {
            assert!(bubble.pos.x.is_finite() && bubble.pos.y.is_finite());
            assert!(bubble.pos.x >= crate::consts::EDGE_PADDING);
        }
    }

    #[test]
    fn test_settle_converges_over_repeated_steps() {
        let vp = Viewport::new(1200.0, 900.0, 0.0);
        let tuning = tuning();
        let mut bubbles = vec![
            bubble_at("a", Tier::Normal, 100.0, Vec2::new(400.0, 400.0)),
            bubble_at("b", Tier::Normal, 100.0, Vec2::new(440.0, 400.0)),
            bubble_at("c", Tier::Normal, 100.0, Vec2::new(420.0, 430.0)),
        ];
        let mut last = usize::MAX;
        for _ in 0..120 {
            last = settle(&mut bubbles, &vp, &tuning);
            if last == 0 {
                break;
            }
        }
        assert_eq!(last, 0, "settle never reached a violation-free step");
        // Velocities decay back toward rest
        for _ in 0..60 {
            settle(&mut bubbles, &vp, &tuning);
        }
        for bubble in &bubbles {
            assert!(bubble.vel.length() < 1.0, "residual velocity {:?}", bubble.vel);
        }
    }

    #[test]
    fn test_empty_and_single_are_trivially_converged() {
        let vp = Viewport::new(800.0, 600.0, 0.0);
        let mut none: Vec<Bubble> = Vec::new();
        assert!(resolve_overlaps(&mut none, &vp, 25, &tuning()).converged);
        let mut one = vec![bubble_at("a", Tier::Normal, 80.0, Vec2::new(100.0, 100.0))];
        assert!(resolve_overlaps(&mut one, &vp, 25, &tuning()).converged);
        assert_eq!(settle(&mut none, &vp, &tuning()), 0);
    }

    #[test]
    fn test_degenerate_viewport_is_noop() {
        let vp = Viewport::new(0.0, 0.0, 0.0);
        let start = Vec2::new(100.0, 100.0);
        let mut bubbles = vec![
            bubble_at("a", Tier::Normal, 80.0, start),
            bubble_at("b", Tier::Normal, 80.0, start),
        ];
        resolve_overlaps(&mut bubbles, &vp, 25, &tuning());
        assert_eq!(bubbles[0].pos, start);
        assert_eq!(bubbles[1].pos, start);
    }
}
