//! Candle placement on the top surface of the cake.
//!
//! Small counts are arranged in concentric rings so they look deliberately
//! placed; larger counts follow a golden-angle spiral which spreads points at
//! near-uniform density without collision checks. A single call never mixes
//! the two strategies.

use std::f32::consts::{PI, TAU};

/// Largest count laid out with rings; anything above uses the spiral.
pub const RING_LAYOUT_MAX: usize = 20;
/// Points per ring.
pub const RING_CAPACITY: usize = 10;
/// Outer ring radius as a fraction of the surface radius.
pub const RING_OUTER_FRACTION: f32 = 0.72;
/// Each inner ring is this fraction of the outer radius smaller.
pub const RING_SHRINK: f32 = 0.35;
/// Angular rotation applied per ring to avoid radial seams.
pub const RING_TWIST: f32 = 0.3;
/// Spiral fills this fraction of the surface radius.
pub const SPIRAL_FILL: f32 = 0.9;

/// Offset of a candle on the top surface plane (y is implied).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub z: f32,
}

impl Placement {
    #[inline]
    pub fn radius(&self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }
    #[inline]
    pub fn angle(&self) -> f32 {
        self.z.atan2(self.x)
    }
}

/// Golden angle in radians, `π(3 − √5)`.
#[inline]
pub fn golden_angle() -> f32 {
    PI * (3.0 - 5.0_f32.sqrt())
}

/// Compute `count` placements within `surface_radius` of the origin.
///
/// Panics when `count` is zero; callers clamp the candle count to at least one.
pub fn compute_placements(count: usize, surface_radius: f32) -> Vec<Placement> {
    assert!(count >= 1, "candle count must be at least 1");
    assert!(surface_radius > 0.0, "surface radius must be positive");
    if count <= RING_LAYOUT_MAX {
        ring_placements(count, surface_radius)
    } else {
        spiral_placements(count, surface_radius)
    }
}

fn ring_placements(count: usize, surface_radius: f32) -> Vec<Placement> {
    if count == 1 {
        return vec![Placement::default()];
    }
    let outer = surface_radius * RING_OUTER_FRACTION;
    let rings = count.div_ceil(RING_CAPACITY);
    let mut out = Vec::with_capacity(count);
    for ring in 0..rings {
        let in_ring = RING_CAPACITY.min(count - out.len());
        let radius = outer * (1.0 - ring as f32 * RING_SHRINK);
        let twist = ring as f32 * RING_TWIST;
        if in_ring == 1 {
            // a lone leftover candle sits in the middle
            out.push(Placement::default());
            continue;
        }
        for i in 0..in_ring {
            let angle = (i as f32 / in_ring as f32) * TAU + twist;
            out.push(Placement {
                x: angle.cos() * radius,
                z: angle.sin() * radius,
            });
        }
    }
    out
}

fn spiral_placements(count: usize, surface_radius: f32) -> Vec<Placement> {
    let step = golden_angle();
    let max_r = surface_radius * SPIRAL_FILL;
    (0..count)
        .map(|i| {
            // area-preserving radius keeps density uniform across the disk
            let r = max_r * ((i as f32 + 0.5) / count as f32).sqrt();
            let angle = i as f32 * step;
            Placement {
                x: angle.cos() * r,
                z: angle.sin() * r,
            }
        })
        .collect()
}
