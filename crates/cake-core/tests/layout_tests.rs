// Host-side tests for candle placement.

use cake_core::layout::*;
use std::f32::consts::TAU;

#[test]
fn every_count_fits_inside_the_surface() {
    for radius in [0.5_f32, 1.4, 3.0] {
        for count in 1..=200 {
            let p = compute_placements(count, radius);
            assert_eq!(p.len(), count);
            for c in &p {
                assert!(c.radius() <= radius + 1e-5, "count {count} escaped radius {radius}");
            }
        }
    }
}

#[test]
fn single_candle_sits_at_the_centre() {
    assert_eq!(compute_placements(1, 1.4), vec![Placement { x: 0.0, z: 0.0 }]);
}

#[test]
fn rings_are_equiangular() {
    for count in [2usize, 5, 7, 10] {
        let p = compute_placements(count, 1.4);
        let step = TAU / count as f32;
        for i in 0..count {
            let a = p[i].angle();
            let b = p[(i + 1) % count].angle();
            let gap = (b - a).rem_euclid(TAU);
            assert!((gap - step).abs() < 1e-4, "count {count}: gap {gap} != {step}");
        }
    }
}

#[test]
fn second_ring_is_twisted_and_smaller() {
    let p = compute_placements(16, 1.4);
    let outer = 1.4 * RING_OUTER_FRACTION;
    let inner = outer * (1.0 - RING_SHRINK);
    assert!(p[10..].iter().all(|c| (c.radius() - inner).abs() < 1e-4));
    assert!((p[10].angle() - RING_TWIST).abs() < 1e-4);
}

#[test]
fn spiral_points_never_coincide() {
    for count in [21usize, 50, 200] {
        let p = compute_placements(count, 1.4);
        for w in p.windows(2) {
            let d = ((w[0].x - w[1].x).powi(2) + (w[0].z - w[1].z).powi(2)).sqrt();
            assert!(d > 1e-3);
        }
    }
}

#[test]
fn spiral_is_used_only_above_twenty() {
    // ring layout places candle 0 at angle 0 on the outer ring
    let rings = compute_placements(RING_LAYOUT_MAX, 1.0);
    assert!((rings[0].radius() - RING_OUTER_FRACTION).abs() < 1e-5);
    let spiral = compute_placements(RING_LAYOUT_MAX + 1, 1.0);
    assert!(spiral[0].radius() < 0.2);
}

#[test]
#[should_panic(expected = "at least 1")]
fn zero_candles_is_a_contract_violation() {
    compute_placements(0, 1.4);
}
