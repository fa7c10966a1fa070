/// Rendering budget resolved once at mount time and threaded into the builder,
/// the animation driver and the renderer.
///
/// Lit/unlit semantics never depend on the profile; it only trades decoration
/// density, tessellation and light count for frame time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderQualityProfile {
    /// Radial segments for tiers and other large round meshes.
    pub segment_count: u32,
    /// Adds a soft contact shadow under the cake.
    pub shadows_enabled: bool,
    /// Maximum number of candle point lights uploaded per frame.
    pub light_count: usize,
    /// Fraction (0..=1) of decorative pieces that get built.
    pub decoration_density: f32,
    /// Adds the fill and back directional lights.
    pub secondary_lights: bool,
    /// Animate flames and smoke on alternate ticks only.
    pub degraded_animation: bool,
}

impl RenderQualityProfile {
    pub fn full() -> Self {
        Self {
            segment_count: 64,
            shadows_enabled: true,
            light_count: crate::constants::MAX_CANDLES,
            decoration_density: 1.0,
            secondary_lights: true,
            degraded_animation: false,
        }
    }

    pub fn constrained() -> Self {
        Self {
            segment_count: 24,
            shadows_enabled: false,
            light_count: 8,
            decoration_density: 0.5,
            secondary_lights: false,
            degraded_animation: true,
        }
    }

    pub fn resolve(device_is_constrained: bool) -> Self {
        if device_is_constrained {
            Self::constrained()
        } else {
            Self::full()
        }
    }

    /// Scale a full-density decoration count, keeping at least one piece.
    #[inline]
    pub fn decorations(&self, full: usize) -> usize {
        ((full as f32 * self.decoration_density.clamp(0.0, 1.0)).round() as usize).max(1)
    }

    /// Tessellation for small meshes, never more than their full-quality value.
    #[inline]
    pub fn small_segments(&self, full: u32) -> u32 {
        full.min(self.segment_count / 2).max(6)
    }
}

impl Default for RenderQualityProfile {
    fn default() -> Self {
        Self::full()
    }
}
